use entities::sea_orm_active_enums::TransactionStatus;
use gem_service::{
    error::{PersistDbError, ServiceError},
    persist::repo::{self, TransferOutcome},
};
use rpc::CreateTransactionRequest;
use std::time::Duration;
use test_log::test;

mod common;
use common::fixtures::{init_persist, random_address, random_wallet};
use common::setup::setup;

#[test(tokio::test)]
async fn records_start_pending_and_finalize_once() -> anyhow::Result<()> {
    let ctx = init_persist().await?;
    let (from, to) = (random_wallet(), random_wallet());

    let pending = repo::create_pending_transaction(&ctx, &from, &to, "1.5").await?;
    assert_eq!(pending.status, TransactionStatus::Pending);
    assert!(pending.tx_hash.is_none());

    let done = repo::finalize_transaction(
        &ctx,
        &pending.id,
        TransferOutcome::Completed {
            tx_hash: "0xabc".into(),
        },
    )
    .await?;
    assert_eq!(done.status, TransactionStatus::Completed);
    assert_eq!(done.tx_hash.as_deref(), Some("0xabc"));

    let again = repo::finalize_transaction(&ctx, &pending.id, TransferOutcome::Failed).await;
    assert!(matches!(
        again,
        Err(PersistDbError::TransactionAlreadyFinal(_))
    ));
    let stored = repo::get_transaction(&ctx, &pending.id)
        .await?
        .expect("record exists");
    assert_eq!(stored.status, TransactionStatus::Completed);
    Ok(())
}

#[test(tokio::test)]
async fn finalizing_an_unknown_record_fails() -> anyhow::Result<()> {
    let ctx = init_persist().await?;
    let res = repo::finalize_transaction(&ctx, "missing", TransferOutcome::Failed).await;
    assert!(matches!(res, Err(PersistDbError::TransactionNotFound(_))));
    Ok(())
}

#[test(tokio::test)]
async fn listing_matches_sender_or_receiver_newest_first() -> anyhow::Result<()> {
    let ctx = init_persist().await?;
    let (me, a, b, stranger) = (random_wallet(), random_wallet(), random_wallet(), random_wallet());

    let sent = repo::create_pending_transaction(&ctx, &me, &a, "1").await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    let received = repo::create_pending_transaction(&ctx, &b, &me, "2").await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    repo::create_pending_transaction(&ctx, &a, &b, "3").await?;

    let mine = repo::get_transactions_for_address(&ctx, &me).await?;
    let ids: Vec<_> = mine.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, [received.id.as_str(), sent.id.as_str()]);

    assert!(repo::get_transactions_for_address(&ctx, &stranger).await?.is_empty());
    Ok(())
}

#[test(tokio::test)]
async fn successful_transfer_completes_the_record() -> anyhow::Result<()> {
    let env = setup().await?;
    let (from, to) = (random_address(), random_address());

    let record = env
        .service
        .create_transaction(CreateTransactionRequest {
            from_address: from.clone(),
            to_address: to.clone(),
            amount: "1.5".into(),
        })
        .await?;

    assert_eq!(record.status, "completed");
    assert!(record.tx_hash.is_some());
    assert_eq!(record.amount, "1.5");

    let transfers = env.chain.transfers.lock().clone();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].2.to_string(), "1500000000000000000");

    let listed = env.service.list_transactions(&to).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    Ok(())
}

#[test(tokio::test)]
async fn failed_transfer_leaves_a_failed_record() -> anyhow::Result<()> {
    let env = setup().await?;
    *env.chain.transfer_hash.lock() = None;
    let from = random_address();

    let err = env
        .service
        .create_transaction(CreateTransactionRequest {
            from_address: from.clone(),
            to_address: random_address(),
            amount: "2".into(),
        })
        .await
        .unwrap_err();

    let transaction_id = match err {
        ServiceError::TransferFailed { transaction_id, .. } => transaction_id,
        other => panic!("expected transfer failure, got {other:?}"),
    };
    let stored = repo::get_transaction(&env.ctx, &transaction_id)
        .await?
        .expect("record kept for audit");
    assert_eq!(stored.status, TransactionStatus::Failed);
    assert!(stored.tx_hash.is_none());
    Ok(())
}

#[test(tokio::test)]
async fn hanging_transfer_times_out_as_failure() -> anyhow::Result<()> {
    let mut config = common::fixtures::build_config();
    config.chain_config.request_timeout_secs = 1;
    let env = common::setup::setup_with_config(config).await?;
    *env.chain.delay.lock() = Some(Duration::from_secs(5));

    let err = env
        .service
        .create_transaction(CreateTransactionRequest {
            from_address: random_address(),
            to_address: random_address(),
            amount: "1".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::TransferFailed { .. }));
    Ok(())
}

#[test(tokio::test)]
async fn invalid_amounts_are_rejected_before_recording() -> anyhow::Result<()> {
    let env = setup().await?;
    let from = random_address();

    for amount in ["abc", "-1", "0.0000000000000000001", ""] {
        let err = env
            .service
            .create_transaction(CreateTransactionRequest {
                from_address: from.clone(),
                to_address: random_address(),
                amount: amount.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParams(_)), "{amount}");
    }

    assert!(env.service.list_transactions(&from).await?.is_empty());
    assert!(env.chain.transfers.lock().is_empty());
    Ok(())
}
