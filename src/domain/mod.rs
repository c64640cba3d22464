mod account;
mod intent;
mod money;
mod transaction;

pub use account::*;
pub use intent::*;
pub use money::*;
pub use transaction::*;
