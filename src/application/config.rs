use crate::storage::StoreOptions;

/// What the ledger does when sender and receiver are the same account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfTransferPolicy {
    /// Record a balance-neutral debit/credit pair
    #[default]
    Allow,
    /// Fail with `AppError::SelfTransfer` before touching the store
    Reject,
}

impl SelfTransferPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelfTransferPolicy::Allow => "allow",
            SelfTransferPolicy::Reject => "reject",
        }
    }
}

impl std::str::FromStr for SelfTransferPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(SelfTransferPolicy::Allow),
            "reject" => Ok(SelfTransferPolicy::Reject),
            other => Err(format!(
                "unknown self-transfer policy '{}' (expected allow or reject)",
                other
            )),
        }
    }
}

impl std::fmt::Display for SelfTransferPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger engine settings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub self_transfer: SelfTransferPolicy,
    /// Number of legs returned by `recent_history`
    pub recent_history_limit: usize,
    pub store: StoreOptions,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            self_transfer: SelfTransferPolicy::Allow,
            recent_history_limit: 5,
            store: StoreOptions::default(),
        }
    }
}

impl LedgerConfig {
    pub fn with_self_transfer(mut self, policy: SelfTransferPolicy) -> Self {
        self.self_transfer = policy;
        self
    }

    pub fn with_recent_history_limit(mut self, limit: usize) -> Self {
        self.recent_history_limit = limit;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.store.max_connections = max_connections;
        self
    }
}
