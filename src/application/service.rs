use anyhow::Context;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::domain::{Account, AccountNumber, Cents, TransactionId, TransactionRecord};
use crate::storage::{AccountStore, Repository, TransactionLog};

use super::{AppError, LedgerConfig, SelfTransferPolicy};

/// The ledger engine: the only component allowed to change balances.
/// This is the primary interface for any client (CLI, command router, tests).
#[derive(Clone)]
pub struct LedgerService {
    repo: Repository,
    config: LedgerConfig,
}

/// Confirmation of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from_account: AccountNumber,
    pub to_account: AccountNumber,
    pub amount_cents: Cents,
    pub debit_id: TransactionId,
    pub credit_id: TransactionId,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository, config: LedgerConfig) -> Self {
        Self { repo, config }
    }

    /// Initialize (or reopen) a database at the given path, creating and seeding it if needed.
    pub async fn init(database_path: &str, config: LedgerConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::init(&db_url, config.store).await?;
        Ok(Self::new(repo, config))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str, config: LedgerConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url, config.store, false).await?;
        Ok(Self::new(repo, config))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Reads
    // ========================

    /// Get an account by number.
    pub async fn get_account(&self, account_number: AccountNumber) -> Result<Account, AppError> {
        let mut conn = self.repo.acquire().await?;
        AccountStore::new(&mut conn)
            .get(account_number)
            .await?
            .ok_or(AppError::AccountNotFound(account_number))
    }

    /// Current balance in cents. Unknown accounts are an error, never a zero balance.
    pub async fn get_balance(&self, account_number: AccountNumber) -> Result<Cents, AppError> {
        let account = self.get_account(account_number).await?;
        tracing::debug!(account = account_number, balance = account.balance_cents, "balance lookup");
        Ok(account.balance_cents)
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(AccountStore::new(&mut conn).list().await?)
    }

    /// Resolve a first name (case-insensitive) to an account number.
    /// When several accounts share the name, the lowest account number wins.
    pub async fn find_account_by_name(&self, name: &str) -> Result<AccountNumber, AppError> {
        let mut conn = self.repo.acquire().await?;
        let matches = AccountStore::new(&mut conn).find_by_first_name(name).await?;
        if matches.len() > 1 {
            tracing::debug!(name, matches = matches.len(), "name matched several accounts");
        }

        matches
            .first()
            .map(|account| account.account_number)
            .ok_or_else(|| AppError::NameNotFound(name.to_string()))
    }

    /// Transaction legs owned by an account, newest first.
    ///
    /// An existing account with no activity yields an empty list; an unknown
    /// account is `AccountNotFound`.
    pub async fn history(
        &self,
        account_number: AccountNumber,
        limit: Option<usize>,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        let mut conn = self.repo.acquire().await?;
        if AccountStore::new(&mut conn).get(account_number).await?.is_none() {
            return Err(AppError::AccountNotFound(account_number));
        }

        Ok(TransactionLog::new(&mut conn)
            .list_by_account(account_number, limit)
            .await?)
    }

    /// The most recent legs, limited by `LedgerConfig::recent_history_limit`.
    pub async fn recent_history(
        &self,
        account_number: AccountNumber,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        self.history(account_number, Some(self.config.recent_history_limit))
            .await
    }

    // ========================
    // Transfers
    // ========================

    /// Move `amount_cents` from one account to another.
    ///
    /// Preconditions are reported in order: invalid amount, unknown account,
    /// insufficient funds. On success both balances and both log legs commit
    /// together; on any failure the transaction is rolled back and nothing changes.
    pub async fn transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount_cents: Cents,
    ) -> Result<TransferReceipt, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        if from == to && self.config.self_transfer == SelfTransferPolicy::Reject {
            return Err(AppError::SelfTransfer(from));
        }

        let mut tx = self.repo.begin().await?;

        match Self::apply_transfer(&mut tx, from, to, amount_cents).await {
            Ok(receipt) => {
                tx.commit().await.context("Failed to commit transfer")?;
                tracing::info!(
                    from,
                    to,
                    amount_cents,
                    debit_id = receipt.debit_id,
                    credit_id = receipt.credit_id,
                    "transfer committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "failed to roll back transfer");
                }
                tracing::warn!(from, to, amount_cents, error = %err, "transfer rolled back");
                Err(err)
            }
        }
    }

    // The debit goes first so the write lock is held before anything else is read.
    async fn apply_transfer(
        conn: &mut SqliteConnection,
        from: AccountNumber,
        to: AccountNumber,
        amount_cents: Cents,
    ) -> Result<TransferReceipt, AppError> {
        let mut accounts = AccountStore::new(&mut *conn);

        if !accounts.debit(from, amount_cents).await? {
            return Err(Self::debit_failure(&mut accounts, from, to, amount_cents).await);
        }

        if !accounts.credit(to, amount_cents).await? {
            return Err(match accounts.get(to).await? {
                None => AppError::AccountNotFound(to),
                Some(_) => AppError::InvalidAmount(format!(
                    "Amount would overflow the balance of account {}",
                    to
                )),
            });
        }

        let (debit_id, credit_id) = TransactionLog::new(&mut *conn)
            .append_transfer(from, to, amount_cents)
            .await?;

        Ok(TransferReceipt {
            from_account: from,
            to_account: to,
            amount_cents,
            debit_id,
            credit_id,
        })
    }

    /// Work out why a conditional debit matched no row.
    async fn debit_failure(
        accounts: &mut AccountStore<'_>,
        from: AccountNumber,
        to: AccountNumber,
        amount_cents: Cents,
    ) -> AppError {
        let lookup = async {
            let sender = accounts.get(from).await?;
            let receiver_exists = accounts.get(to).await?.is_some();
            Ok::<_, anyhow::Error>((sender, receiver_exists))
        };

        match lookup.await {
            Err(err) => AppError::StoreUnavailable(err),
            Ok((None, _)) => AppError::AccountNotFound(from),
            Ok((Some(_), false)) => AppError::AccountNotFound(to),
            Ok((Some(sender), true)) => AppError::InsufficientFunds {
                account_number: from,
                balance: sender.balance_cents,
                required: amount_cents,
            },
        }
    }
}
