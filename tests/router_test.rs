mod common;

use anyhow::Result;
use common::{LOK, MISSING, PAWAN, SURENDRA, test_service};
use teller::domain::{Intent, LegType};
use teller::router::{CommandRouter, PhraseClassifier, RouteOutcome};

#[tokio::test]
async fn test_transfer_by_name() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service.clone(), PhraseClassifier::default());

    let reply = router.respond(LOK, "transfer 500 to PAWAN").await;
    assert_eq!(
        reply,
        "Transaction successful: $500.00 sent from account 123 to account 234."
    );
    assert_eq!(service.get_balance(LOK).await?, 450000);
    assert_eq!(service.get_balance(PAWAN).await?, 1050000);

    Ok(())
}

#[tokio::test]
async fn test_acting_account_is_explicit() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service.clone(), PhraseClassifier::default());

    let outcome = router.route(SURENDRA, "transfer 100 to lok").await?;
    match outcome {
        RouteOutcome::Transferred(receipt) => {
            assert_eq!(receipt.from_account, SURENDRA);
            assert_eq!(receipt.to_account, LOK);
            assert_eq!(receipt.amount_cents, 10000);
        }
        other => panic!("expected a transfer, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_balance_question() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service, PhraseClassifier::default());

    assert_eq!(
        router.respond(PAWAN, "What's my account balance?").await,
        "Balance for account 234: $10000.00"
    );

    Ok(())
}

#[tokio::test]
async fn test_history_request() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service.clone(), PhraseClassifier::default());

    assert_eq!(
        router.respond(LOK, "show my transaction history").await,
        "No transaction history found for this account."
    );

    service.transfer(LOK, PAWAN, 50000).await?;
    match router.route(LOK, "show my last five transactions").await? {
        RouteOutcome::History {
            account_number,
            records,
        } => {
            assert_eq!(account_number, LOK);
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].leg_type, LegType::Debit);
        }
        other => panic!("expected history, got {:?}", other),
    }

    let reply = router.respond(LOK, "show my transaction history").await;
    assert!(reply.starts_with("ID: 1, Type: Debit, Amount: $500.00, Sent Money To: 234"));

    Ok(())
}

#[tokio::test]
async fn test_failure_messages() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service.clone(), PhraseClassifier::default());

    assert_eq!(
        router.respond(LOK, "transfer 999999 to pawan").await,
        "Insufficient balance."
    );
    assert_eq!(
        router.respond(LOK, "transfer 10 to john").await,
        "No account found with the name 'john'."
    );
    assert_eq!(
        router.respond(LOK, "transfer lots to pawan").await,
        "Please make sure to say the amount and the recipient's name correctly."
    );
    assert_eq!(
        router.respond(LOK, "transfer 0 to pawan").await,
        "Please enter a positive amount."
    );
    assert_eq!(
        router.respond(MISSING, "transfer 10 to pawan").await,
        "Please enter a valid account number."
    );
    assert_eq!(
        router.respond(MISSING, "check my balance").await,
        "Account number does not exist."
    );
    assert_eq!(router.respond(LOK, "hello there").await, "Sorry, I didn't understand that.");
    assert_eq!(router.respond(LOK, "   ").await, "No command received.");

    // None of the failures moved money
    assert_eq!(service.get_balance(LOK).await?, 500000);
    assert_eq!(service.get_balance(PAWAN).await?, 1000000);

    Ok(())
}

#[tokio::test]
async fn test_injected_classifier() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let router = CommandRouter::new(service, |_: &str| Intent::CheckBalance);

    // Whatever the text says, the injected classifier decides the operation
    match router.route(SURENDRA, "transfer 10 to pawan").await? {
        RouteOutcome::Balance { balance_cents, .. } => assert_eq!(balance_cents, 500000),
        other => panic!("expected balance, got {:?}", other),
    }

    Ok(())
}
