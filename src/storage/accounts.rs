use anyhow::{Context, Result};
use sqlx::{Row, SqliteConnection};

use crate::domain::{Account, AccountNumber, Cents};

const ACCOUNT_COLUMNS: &str =
    "account_number, first_name, last_name, account_type, balance_cents";

/// Keyed access to account records over a borrowed connection.
///
/// The store never opens its own transaction: callers decide whether it runs
/// on a plain pooled connection or inside a ledger transaction.
pub struct AccountStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> AccountStore<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert a new account.
    pub async fn insert(&mut self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_number, first_name, last_name, account_type, balance_cents)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.account_number)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.account_type)
        .bind(account.balance_cents)
        .execute(&mut *self.conn)
        .await
        .with_context(|| format!("Failed to insert account {}", account.account_number))?;
        Ok(())
    }

    /// Get an account by number.
    pub async fn get(&mut self, account_number: AccountNumber) -> Result<Option<Account>> {
        let query = format!(
            "SELECT {} FROM accounts WHERE account_number = ?",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(account_number)
            .fetch_optional(&mut *self.conn)
            .await
            .context("Failed to fetch account")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// Overwrite the balance of an account. Returns false when the account does not exist.
    pub async fn set_balance(
        &mut self,
        account_number: AccountNumber,
        balance_cents: Cents,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE accounts SET balance_cents = ? WHERE account_number = ?")
            .bind(balance_cents)
            .bind(account_number)
            .execute(&mut *self.conn)
            .await
            .context("Failed to set account balance")?;
        Ok(result.rows_affected() == 1)
    }

    /// Subtract `amount_cents` only if the current balance covers it.
    ///
    /// The check and the write are one statement, so two writers can never both
    /// pass the check against the same stale balance. Returns false when the
    /// account is missing or the funds are insufficient.
    pub async fn debit(&mut self, account_number: AccountNumber, amount_cents: Cents) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents - ?
            WHERE account_number = ? AND balance_cents >= ?
            "#,
        )
        .bind(amount_cents)
        .bind(account_number)
        .bind(amount_cents)
        .execute(&mut *self.conn)
        .await
        .context("Failed to debit account")?;

        let applied = result.rows_affected() == 1;
        if !applied {
            tracing::debug!(account = account_number, amount_cents, "conditional debit matched no row");
        }
        Ok(applied)
    }

    /// Add `amount_cents` unless the balance would overflow.
    /// Returns false when the account is missing or the balance is already at the limit.
    pub async fn credit(&mut self, account_number: AccountNumber, amount_cents: Cents) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents + ?
            WHERE account_number = ? AND balance_cents <= ?
            "#,
        )
        .bind(amount_cents)
        .bind(account_number)
        .bind(Cents::MAX - amount_cents)
        .execute(&mut *self.conn)
        .await
        .context("Failed to credit account")?;

        let applied = result.rows_affected() == 1;
        if !applied {
            tracing::debug!(account = account_number, amount_cents, "credit matched no row");
        }
        Ok(applied)
    }

    /// Find accounts whose first name matches, ignoring case.
    /// Ordered by account number; callers take the first match.
    pub async fn find_by_first_name(&mut self, name: &str) -> Result<Vec<Account>> {
        let query = format!(
            "SELECT {} FROM accounts WHERE first_name = ? COLLATE NOCASE ORDER BY account_number",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(name)
            .fetch_all(&mut *self.conn)
            .await
            .context("Failed to find accounts by name")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// List all accounts ordered by account number.
    pub async fn list(&mut self) -> Result<Vec<Account>> {
        let query = format!(
            "SELECT {} FROM accounts ORDER BY account_number",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .fetch_all(&mut *self.conn)
            .await
            .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    pub async fn count(&mut self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM accounts")
            .fetch_one(&mut *self.conn)
            .await
            .context("Failed to count accounts")?;
        Ok(row.get("count"))
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        Ok(Account {
            account_number: row.try_get("account_number")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            account_type: row.try_get("account_type")?,
            balance_cents: row
                .try_get("balance_cents")
                .context("Invalid account balance")?,
        })
    }
}
