use thiserror::Error;

use crate::domain::{AccountNumber, Cents, format_cents};

fn amount(cents: &Cents) -> String {
    format_cents(*cents)
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error(
        "Insufficient funds in account {account_number}: balance {}, required {}",
        amount(.balance),
        amount(.required)
    )]
    InsufficientFunds {
        account_number: AccountNumber,
        balance: Cents,
        required: Cents,
    },

    #[error("Transfers from account {0} to itself are not allowed")]
    SelfTransfer(AccountNumber),

    #[error("No account found with the name '{0}'")]
    NameNotFound(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures caused by the backing store rather than by the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}
