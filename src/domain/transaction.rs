use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountNumber, Cents};

pub type TransactionId = i64;

/// Which side of a transfer a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegType {
    /// Money left the owning account
    Debit,
    /// Money arrived in the owning account
    Credit,
}

impl LegType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegType::Debit => "Debit",
            LegType::Credit => "Credit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Debit" => Some(LegType::Debit),
            "Credit" => Some(LegType::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for LegType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A leg waiting to be appended to the transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeg {
    pub account_number: AccountNumber,
    pub sent_to_number: Option<AccountNumber>,
    pub leg_type: LegType,
    pub amount_cents: Cents,
}

impl NewLeg {
    pub fn debit(from: AccountNumber, to: AccountNumber, amount_cents: Cents) -> Self {
        assert!(amount_cents > 0, "Leg amount must be positive");
        Self {
            account_number: from,
            sent_to_number: Some(to),
            leg_type: LegType::Debit,
            amount_cents,
        }
    }

    pub fn credit(to: AccountNumber, from: AccountNumber, amount_cents: Cents) -> Self {
        assert!(amount_cents > 0, "Leg amount must be positive");
        Self {
            account_number: to,
            sent_to_number: Some(from),
            leg_type: LegType::Credit,
            amount_cents,
        }
    }
}

/// One immutable entry in the append-only transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    /// Owner of the leg
    pub account_number: AccountNumber,
    /// Counterparty account
    pub sent_to_number: Option<AccountNumber>,
    pub leg_type: LegType,
    pub amount_cents: Cents,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_type_roundtrip() {
        for lt in [LegType::Debit, LegType::Credit] {
            assert_eq!(LegType::from_str(lt.as_str()), Some(lt));
        }
        assert_eq!(LegType::from_str("debit"), None);
    }

    #[test]
    fn test_debit_and_credit_mirror_each_other() {
        let debit = NewLeg::debit(123, 234, 50000);
        let credit = NewLeg::credit(234, 123, 50000);

        assert_eq!(debit.account_number, credit.sent_to_number.unwrap());
        assert_eq!(credit.account_number, debit.sent_to_number.unwrap());
        assert_eq!(debit.leg_type, LegType::Debit);
        assert_eq!(credit.leg_type, LegType::Credit);
    }

    #[test]
    #[should_panic(expected = "Leg amount must be positive")]
    fn test_leg_requires_positive_amount() {
        NewLeg::debit(123, 234, 0);
    }
}
