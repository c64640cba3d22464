pub mod application;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod router;
pub mod storage;

pub use domain::*;
pub use storage::Repository;
