use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::application::{LedgerConfig, LedgerService, SelfTransferPolicy};
use crate::domain::{AccountNumber, TransactionRecord, format_cents, parse_cents};
use crate::router::{CommandRouter, PhraseClassifier, describe_record};

/// Teller - natural-language banking over an atomic account ledger
#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "Check balances, move money and read history, in plain words or explicit commands")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "TELLER_DATABASE", default_value = "teller.db")]
    pub database: String,

    /// Account acting on behalf of the user
    #[arg(short, long, env = "TELLER_ACCOUNT", global = true)]
    pub account: Option<AccountNumber>,

    /// Whether transfers from an account to itself are allowed: allow, reject
    #[arg(long, env = "TELLER_SELF_TRANSFER", default_value = "allow")]
    pub self_transfer: SelfTransferPolicy,

    /// Maximum number of pooled database connections
    #[arg(long, default_value = "8")]
    pub max_connections: u32,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and seed accounts (no-op if already initialized)
    Init,

    /// List all accounts with their balances
    Accounts,

    /// Show the balance of an account (defaults to the acting account)
    Balance {
        /// Account number
        account_number: Option<AccountNumber>,
    },

    /// Transfer money from the acting account
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Recipient account number
        #[arg(long, required_unless_present = "to_name", conflicts_with = "to_name")]
        to: Option<AccountNumber>,

        /// Recipient first name (case-insensitive)
        #[arg(long)]
        to_name: Option<String>,
    },

    /// Show transaction history, newest first (defaults to the acting account)
    History {
        /// Account number
        account_number: Option<AccountNumber>,

        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Find the account number for a first name
    Find {
        /// First name (case-insensitive)
        name: String,
    },

    /// Ask in plain words, e.g. "transfer 500 to pawan"
    Ask {
        /// The command text
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,

        /// Print the reply as {"response": "..."}
        #[arg(long)]
        json: bool,
    },
}

/// Flat history row for CSV output
#[derive(Serialize)]
struct HistoryRow {
    transaction_id: i64,
    transaction_type: String,
    amount: String,
    counterparty: Option<AccountNumber>,
    timestamp: String,
}

impl From<&TransactionRecord> for HistoryRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            transaction_type: record.leg_type.to_string(),
            amount: format_cents(record.amount_cents),
            counterparty: record.sent_to_number,
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

impl Cli {
    fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig::default()
            .with_self_transfer(self.self_transfer)
            .with_max_connections(self.max_connections)
    }

    fn acting_account(&self, explicit: Option<AccountNumber>) -> Result<AccountNumber> {
        explicit
            .or(self.account)
            .context("No account given. Pass --account or set TELLER_ACCOUNT")
    }

    pub async fn run(self) -> Result<()> {
        let config = self.ledger_config();

        if matches!(self.command, Commands::Init) {
            let service = LedgerService::init(&self.database, config).await?;
            let accounts = service.list_accounts().await?;
            println!(
                "Database initialized: {} ({} accounts)",
                self.database,
                accounts.len()
            );
            return Ok(());
        }

        let service = LedgerService::connect(&self.database, config)
            .await
            .with_context(|| {
                format!(
                    "Could not open '{}'. Run 'teller init' first",
                    self.database
                )
            })?;

        match &self.command {
            // Handled before connecting
            Commands::Init => {}

            Commands::Accounts => {
                let accounts = service.list_accounts().await?;
                println!("{:<10} {:<24} {:<10} {:>14}", "NUMBER", "NAME", "TYPE", "BALANCE");
                for account in accounts {
                    println!(
                        "{:<10} {:<24} {:<10} {:>14}",
                        account.account_number,
                        account.full_name(),
                        account.account_type,
                        format_cents(account.balance_cents)
                    );
                }
            }

            Commands::Balance { account_number } => {
                let account = self.acting_account(*account_number)?;
                let balance = service.get_balance(account).await?;
                println!("{}: {}", account, format_cents(balance));
            }

            Commands::Transfer {
                amount,
                to,
                to_name,
            } => {
                let from = self.acting_account(None)?;
                let amount_cents =
                    parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let to = match (to, to_name) {
                    (Some(number), _) => *number,
                    (None, Some(name)) => service.find_account_by_name(name).await?,
                    (None, None) => anyhow::bail!("Pass --to or --to-name"),
                };

                let receipt = service.transfer(from, to, amount_cents).await?;
                println!(
                    "Transferred {} from {} to {} (legs {}, {})",
                    format_cents(receipt.amount_cents),
                    receipt.from_account,
                    receipt.to_account,
                    receipt.debit_id,
                    receipt.credit_id
                );
            }

            Commands::History {
                account_number,
                limit,
                format,
            } => {
                let account = self.acting_account(*account_number)?;
                let records = service.history(account, *limit).await?;
                print_history(&records, format)?;
            }

            Commands::Find { name } => {
                let account = service.find_account_by_name(name).await?;
                println!("{}", account);
            }

            Commands::Ask { text, json } => {
                let account = self.acting_account(None)?;
                let router = CommandRouter::new(service.clone(), PhraseClassifier::default());
                let response = router.respond(account, &text.join(" ")).await;

                if *json {
                    println!("{}", serde_json::json!({ "response": response }));
                } else {
                    println!("{}", response);
                }
            }
        }

        service.repository().close().await;
        Ok(())
    }
}

fn print_history(records: &[TransactionRecord], format: &str) -> Result<()> {
    match format {
        "table" => {
            if records.is_empty() {
                println!("No transaction history found for this account.");
            }
            for record in records {
                println!("{}", describe_record(record));
            }
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for record in records {
                writer.serialize(HistoryRow::from(record))?;
            }
            writer.flush()?;
        }
        other => anyhow::bail!("Unknown format '{}'. Use table, json or csv", other),
    }
    Ok(())
}
