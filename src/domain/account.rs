use serde::{Deserialize, Serialize};

use super::Cents;

/// Account numbers are positive integers assigned outside the ledger.
pub type AccountNumber = i64;

/// A customer account. Balance is only ever changed by the ledger's transfer operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: AccountNumber,
    pub first_name: String,
    pub last_name: String,
    /// Free-text category such as "SAVING". Not validated.
    pub account_type: String,
    /// Balance in cents, never negative
    pub balance_cents: Cents,
}

impl Account {
    pub fn new(
        account_number: AccountNumber,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        account_type: impl Into<String>,
        balance_cents: Cents,
    ) -> Self {
        assert!(account_number > 0, "Account number must be positive");
        assert!(balance_cents >= 0, "Account balance must not be negative");
        Self {
            account_number,
            first_name: first_name.into(),
            last_name: last_name.into(),
            account_type: account_type.into(),
            balance_cents,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let account = Account::new(123, "lok", "chandra", "SAVING", 500000);
        assert_eq!(account.full_name(), "lok chandra");
    }

    #[test]
    #[should_panic(expected = "Account balance must not be negative")]
    fn test_account_rejects_negative_balance() {
        Account::new(1, "a", "b", "SAVING", -1);
    }
}
