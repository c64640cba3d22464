use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqliteConnection};

use crate::domain::{AccountNumber, Cents, LegType, NewLeg, TransactionId, TransactionRecord};

/// Fixed-width RFC 3339 so that text ordering in SQL matches time ordering.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Append-only log of transfer legs over a borrowed connection.
pub struct TransactionLog<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TransactionLog<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Append a single leg stamped with the current time.
    pub async fn append(&mut self, leg: &NewLeg) -> Result<TransactionId> {
        self.append_at(leg, Utc::now()).await
    }

    /// Append the debit and credit legs of one transfer with a shared timestamp.
    /// Returns `(debit_id, credit_id)`.
    pub async fn append_transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount_cents: Cents,
    ) -> Result<(TransactionId, TransactionId)> {
        let timestamp = Utc::now();
        let debit_id = self
            .append_at(&NewLeg::debit(from, to, amount_cents), timestamp)
            .await?;
        let credit_id = self
            .append_at(&NewLeg::credit(to, from, amount_cents), timestamp)
            .await?;
        Ok((debit_id, credit_id))
    }

    async fn append_at(&mut self, leg: &NewLeg, timestamp: DateTime<Utc>) -> Result<TransactionId> {
        let result = sqlx::query(
            r#"
            INSERT INTO transaction_history (account_number, sent_to_number, transaction_type, amount_cents, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(leg.account_number)
        .bind(leg.sent_to_number)
        .bind(leg.leg_type.as_str())
        .bind(leg.amount_cents)
        .bind(format_timestamp(timestamp))
        .execute(&mut *self.conn)
        .await
        .with_context(|| {
            format!(
                "Failed to append {} leg for account {}",
                leg.leg_type, leg.account_number
            )
        })?;

        let id = result.last_insert_rowid();
        tracing::debug!(
            transaction_id = id,
            account = leg.account_number,
            leg = %leg.leg_type,
            amount_cents = leg.amount_cents,
            "leg appended"
        );
        Ok(id)
    }

    /// List the legs owned by an account, newest first.
    pub async fn list_by_account(
        &mut self,
        account_number: AccountNumber,
        limit: Option<usize>,
    ) -> Result<Vec<TransactionRecord>> {
        let mut query = String::from(
            r#"
            SELECT transaction_id, account_number, sent_to_number, transaction_type, amount_cents, timestamp
            FROM transaction_history
            WHERE account_number = ?
            ORDER BY timestamp DESC, transaction_id DESC
            "#,
        );
        // SQLite limits are signed; anything larger means no limit
        let limit = limit.map(|lim| i64::try_from(lim).unwrap_or(i64::MAX));
        if limit.is_some() {
            query.push_str(" LIMIT ?");
        }

        let mut stmt = sqlx::query(&query).bind(account_number);
        if let Some(lim) = limit {
            stmt = stmt.bind(lim);
        }

        let rows = stmt
            .fetch_all(&mut *self.conn)
            .await
            .context("Failed to list transaction history")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Total number of legs in the log.
    pub async fn count(&mut self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM transaction_history")
            .fetch_one(&mut *self.conn)
            .await
            .context("Failed to count transaction history")?;
        Ok(row.get("count"))
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord> {
        let type_str: String = row.try_get("transaction_type")?;
        let timestamp_str: String = row.try_get("timestamp")?;

        Ok(TransactionRecord {
            transaction_id: row.try_get("transaction_id")?,
            account_number: row.try_get("account_number")?,
            sent_to_number: row.try_get("sent_to_number")?,
            leg_type: LegType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", type_str))?,
            amount_cents: row.try_get("amount_cents")?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .context("Invalid transaction timestamp")?
                .with_timezone(&Utc),
        })
    }
}
