mod accounts;
mod repository;
mod transactions;

pub use accounts::*;
pub use repository::*;
pub use transactions::*;

/// SQL migration for the accounts table
pub const MIGRATION_001_ACCOUNTS: &str = include_str!("migrations/001_accounts.sql");

/// SQL migration for the transaction history log
pub const MIGRATION_002_TRANSACTION_HISTORY: &str =
    include_str!("migrations/002_transaction_history.sql");
