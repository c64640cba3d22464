// Command router - turns free text into ledger calls.
// Classification is delegated to an injected `IntentClassifier`; the ledger never sees text.

mod classifier;
mod command;

pub use classifier::*;
pub use command::*;

use serde::Serialize;

use crate::application::{AppError, LedgerService, TransferReceipt};
use crate::domain::{AccountNumber, Cents, Intent, TransactionRecord, format_cents};

/// Typed result of routing one command
#[derive(Debug, Clone, Serialize)]
pub enum RouteOutcome {
    Balance {
        account_number: AccountNumber,
        balance_cents: Cents,
    },
    Transferred(TransferReceipt),
    History {
        account_number: AccountNumber,
        records: Vec<TransactionRecord>,
    },
    NotUnderstood,
}

/// Routes commands issued on behalf of an explicit acting account.
pub struct CommandRouter<C> {
    ledger: LedgerService,
    classifier: C,
}

impl<C: IntentClassifier> CommandRouter<C> {
    pub fn new(ledger: LedgerService, classifier: C) -> Self {
        Self { ledger, classifier }
    }

    /// Classify `text` and run the matching ledger operation for `account`.
    pub async fn route(&self, account: AccountNumber, text: &str) -> Result<RouteOutcome, AppError> {
        let intent = self.classifier.classify(text);
        self.dispatch(intent, account, text).await
    }

    /// Like `route`, but always produces a message for the caller.
    pub async fn respond(&self, account: AccountNumber, text: &str) -> String {
        if text.trim().is_empty() {
            return "No command received.".to_string();
        }

        let intent = self.classifier.classify(text);
        match self.dispatch(intent, account, text).await {
            Ok(outcome) => describe_outcome(&outcome),
            Err(err) => {
                if err.is_store_failure() {
                    tracing::error!(account, %intent, error = %err, "command failed");
                } else {
                    tracing::debug!(account, %intent, error = %err, "command rejected");
                }
                describe_error(intent, &err)
            }
        }
    }

    async fn dispatch(
        &self,
        intent: Intent,
        account: AccountNumber,
        text: &str,
    ) -> Result<RouteOutcome, AppError> {
        match intent {
            Intent::CheckBalance => Ok(RouteOutcome::Balance {
                account_number: account,
                balance_cents: self.ledger.get_balance(account).await?,
            }),
            Intent::TransferMoney => {
                let command = parse_transfer_command(text)?;
                let recipient = self.ledger.find_account_by_name(&command.recipient).await?;
                let receipt = self
                    .ledger
                    .transfer(account, recipient, command.amount_cents)
                    .await?;
                Ok(RouteOutcome::Transferred(receipt))
            }
            Intent::GetLastTransactions => Ok(RouteOutcome::History {
                account_number: account,
                records: self.ledger.recent_history(account).await?,
            }),
            Intent::Unknown => Ok(RouteOutcome::NotUnderstood),
        }
    }
}

/// Render one history line.
pub fn describe_record(record: &TransactionRecord) -> String {
    format!(
        "ID: {}, Type: {}, Amount: ${}, Sent Money To: {}, Time: {}",
        record.transaction_id,
        record.leg_type,
        format_cents(record.amount_cents),
        record
            .sent_to_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        record.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn describe_outcome(outcome: &RouteOutcome) -> String {
    match outcome {
        RouteOutcome::Balance {
            account_number,
            balance_cents,
        } => format!(
            "Balance for account {}: ${}",
            account_number,
            format_cents(*balance_cents)
        ),
        RouteOutcome::Transferred(receipt) => format!(
            "Transaction successful: ${} sent from account {} to account {}.",
            format_cents(receipt.amount_cents),
            receipt.from_account,
            receipt.to_account
        ),
        RouteOutcome::History { records, .. } if records.is_empty() => {
            "No transaction history found for this account.".to_string()
        }
        RouteOutcome::History { records, .. } => records
            .iter()
            .map(describe_record)
            .collect::<Vec<_>>()
            .join("\n"),
        RouteOutcome::NotUnderstood => "Sorry, I didn't understand that.".to_string(),
    }
}

/// User-facing message for a failed command.
pub fn describe_error(intent: Intent, err: &AppError) -> String {
    match err {
        AppError::InvalidCommand(_) => {
            "Please make sure to say the amount and the recipient's name correctly.".to_string()
        }
        AppError::InvalidAmount(_) => "Please enter a positive amount.".to_string(),
        AppError::AccountNotFound(_) if intent == Intent::TransferMoney => {
            "Please enter a valid account number.".to_string()
        }
        AppError::AccountNotFound(_) => "Account number does not exist.".to_string(),
        AppError::InsufficientFunds { .. } => "Insufficient balance.".to_string(),
        AppError::SelfTransfer(_) => "You cannot transfer money to your own account.".to_string(),
        AppError::NameNotFound(name) => format!("No account found with the name '{}'.", name),
        AppError::StoreUnavailable(_) => {
            "Transaction failed: the account store is unavailable.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::LegType;

    #[test]
    fn test_describe_record() {
        let record = TransactionRecord {
            transaction_id: 7,
            account_number: 123,
            sent_to_number: Some(234),
            leg_type: LegType::Debit,
            amount_cents: 50000,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };
        assert_eq!(
            describe_record(&record),
            "ID: 7, Type: Debit, Amount: $500.00, Sent Money To: 234, Time: 2024-03-01 12:00:00"
        );
    }

    #[test]
    fn test_describe_empty_history() {
        let outcome = RouteOutcome::History {
            account_number: 135,
            records: Vec::new(),
        };
        assert_eq!(
            describe_outcome(&outcome),
            "No transaction history found for this account."
        );
    }

    #[test]
    fn test_account_not_found_message_depends_on_intent() {
        let err = AppError::AccountNotFound(999);
        assert_eq!(
            describe_error(Intent::TransferMoney, &err),
            "Please enter a valid account number."
        );
        assert_eq!(
            describe_error(Intent::CheckBalance, &err),
            "Account number does not exist."
        );
    }
}
