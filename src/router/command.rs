use crate::application::AppError;
use crate::domain::{Cents, parse_cents};

/// A transfer request pulled out of free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub amount_cents: Cents,
    /// First name of the recipient, as typed
    pub recipient: String,
}

/// Parse "transfer <amount> to <name>".
///
/// The amount is the second word and the recipient the fourth; the verb and
/// the preposition are not checked. Anything unparseable is `InvalidCommand`.
/// Non-positive amounts parse here and are rejected by the ledger.
pub fn parse_transfer_command(text: &str) -> Result<TransferCommand, AppError> {
    let words: Vec<&str> = text.split_whitespace().collect();

    let (Some(amount), Some(name)) = (words.get(1), words.get(3)) else {
        return Err(AppError::InvalidCommand(format!(
            "expected 'transfer <amount> to <name>', got '{}'",
            text.trim()
        )));
    };

    let amount_cents = parse_cents(amount)
        .map_err(|e| AppError::InvalidCommand(format!("'{}' is not an amount: {}", amount, e)))?;

    let recipient = name.trim_end_matches(|c: char| c.is_ascii_punctuation());
    if recipient.is_empty() {
        return Err(AppError::InvalidCommand(format!(
            "'{}' is not a recipient name",
            name
        )));
    }

    Ok(TransferCommand {
        amount_cents,
        recipient: recipient.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_command() {
        let cmd = parse_transfer_command("transfer 500 to pawan").unwrap();
        assert_eq!(cmd.amount_cents, 50000);
        assert_eq!(cmd.recipient, "pawan");
    }

    #[test]
    fn test_parse_transfer_command_with_currency_and_punctuation() {
        let cmd = parse_transfer_command("Send $12.50 to Surendra.").unwrap();
        assert_eq!(cmd.amount_cents, 1250);
        assert_eq!(cmd.recipient, "Surendra");
    }

    #[test]
    fn test_parse_transfer_command_ignores_trailing_words() {
        let cmd = parse_transfer_command("transfer 10 to lok please").unwrap();
        assert_eq!(cmd.recipient, "lok");
    }

    #[test]
    fn test_parse_transfer_command_missing_words() {
        assert!(matches!(
            parse_transfer_command("transfer 500"),
            Err(AppError::InvalidCommand(_))
        ));
        assert!(matches!(
            parse_transfer_command(""),
            Err(AppError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_transfer_command_bad_amount() {
        assert!(matches!(
            parse_transfer_command("transfer money to pawan"),
            Err(AppError::InvalidCommand(_))
        ));
        assert!(matches!(
            parse_transfer_command("transfer inf to pawan"),
            Err(AppError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_transfer_command_keeps_negative_amount_for_ledger() {
        let cmd = parse_transfer_command("transfer -5 to pawan").unwrap();
        assert_eq!(cmd.amount_cents, -500);
    }
}
