// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use teller::application::{LedgerConfig, LedgerService};
use teller::domain::{AccountNumber, Cents, TransactionRecord};
use tempfile::TempDir;

pub const LOK: AccountNumber = 123;
pub const PAWAN: AccountNumber = 234;
pub const SURENDRA: AccountNumber = 135;
pub const MISSING: AccountNumber = 999;

/// Helper to create a seeded test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    test_service_with(LedgerConfig::default()).await
}

/// Same as `test_service` with a custom configuration
pub async fn test_service_with(config: LedgerConfig) -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), config).await?;
    Ok((service, temp_dir))
}

/// Snapshot of every balance plus the full log, used to prove a call changed nothing
#[derive(Debug, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub balances: Vec<(AccountNumber, Cents)>,
    pub histories: Vec<Vec<TransactionRecord>>,
}

pub async fn snapshot(service: &LedgerService) -> Result<LedgerSnapshot> {
    let accounts = service.list_accounts().await?;
    let mut histories = Vec::new();
    for account in &accounts {
        histories.push(service.history(account.account_number, None).await?);
    }

    Ok(LedgerSnapshot {
        balances: accounts
            .iter()
            .map(|a| (a.account_number, a.balance_cents))
            .collect(),
        histories,
    })
}

pub async fn total_money(service: &LedgerService) -> Result<Cents> {
    Ok(service
        .list_accounts()
        .await?
        .iter()
        .map(|a| a.balance_cents)
        .sum())
}
