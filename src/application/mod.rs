// Application layer - the ledger engine and its configuration.
// The command router and CLI call into `LedgerService`; nothing else mutates balances.

pub mod config;
pub mod error;
pub mod service;

pub use config::*;
pub use error::*;
pub use service::*;
