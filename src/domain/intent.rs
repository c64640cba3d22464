use serde::{Deserialize, Serialize};

/// The classified purpose of a natural-language command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    CheckBalance,
    TransferMoney,
    GetLastTransactions,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CheckBalance => "CheckBalance",
            Intent::TransferMoney => "TransferMoney",
            Intent::GetLastTransactions => "GetLastTransactions",
            Intent::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
