use crate::error::PersistDbError;
use crate::persist::PersistCtx;
use entities::sea_orm_active_enums::TransactionStatus;
use entities::transaction_record;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use super::common::{WalletAddress, new_uuid, now};

/// How an on-chain transfer ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed { tx_hash: String },
    Failed,
}

pub async fn create_pending_transaction(
    ctx: &PersistCtx,
    from: &WalletAddress,
    to: &WalletAddress,
    amount: &str,
) -> Result<transaction_record::Model, PersistDbError> {
    let now = now();
    let id = new_uuid();
    let record = transaction_record::ActiveModel {
        id: Set(id.clone()),
        from_address: Set(from.as_str().to_owned()),
        to_address: Set(to.as_str().to_owned()),
        amount: Set(amount.trim().to_owned()),
        tx_hash: Set(None),
        status: Set(TransactionStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    };

    transaction_record::Entity::insert(record)
        .exec_without_returning(ctx.db.as_ref())
        .await?;

    get_transaction(ctx, &id)
        .await?
        .ok_or(PersistDbError::TransactionNotFound(id))
}

pub async fn get_transaction(
    ctx: &PersistCtx,
    id: &str,
) -> Result<Option<transaction_record::Model>, PersistDbError> {
    let row = transaction_record::Entity::find_by_id(id.to_owned())
        .one(ctx.db.as_ref())
        .await?;
    Ok(row)
}

/// Moves a pending record to its terminal status. A record is finalized at
/// most once; finalizing it again fails with `TransactionAlreadyFinal`.
pub async fn finalize_transaction(
    ctx: &PersistCtx,
    id: &str,
    outcome: TransferOutcome,
) -> Result<transaction_record::Model, PersistDbError> {
    let (status, tx_hash) = match outcome {
        TransferOutcome::Completed { tx_hash } => (TransactionStatus::Completed, Some(tx_hash)),
        TransferOutcome::Failed => (TransactionStatus::Failed, None),
    };

    let mut update = transaction_record::Entity::update_many()
        .filter(transaction_record::Column::Id.eq(id))
        .filter(transaction_record::Column::Status.eq(TransactionStatus::Pending))
        .col_expr(transaction_record::Column::Status, Expr::value(status))
        .col_expr(transaction_record::Column::UpdatedAt, Expr::value(now()));
    if let Some(hash) = tx_hash {
        update = update.col_expr(transaction_record::Column::TxHash, Expr::value(hash));
    }
    let res = update.exec(ctx.db.as_ref()).await?;

    let record = get_transaction(ctx, id)
        .await?
        .ok_or_else(|| PersistDbError::TransactionNotFound(id.to_owned()))?;
    match (res.rows_affected, record.status.is_terminal()) {
        (0, true) => Err(PersistDbError::TransactionAlreadyFinal(id.to_owned())),
        (0, false) => Err(PersistDbError::InvariantViolation(format!(
            "transaction {id} still pending after finalize"
        ))),
        _ => Ok(record),
    }
}

/// Records where `address` is sender or receiver, newest first.
pub async fn get_transactions_for_address(
    ctx: &PersistCtx,
    address: &WalletAddress,
) -> Result<Vec<transaction_record::Model>, PersistDbError> {
    let rows = transaction_record::Entity::find()
        .filter(
            Condition::any()
                .add(transaction_record::Column::FromAddress.eq(address.as_str()))
                .add(transaction_record::Column::ToAddress.eq(address.as_str())),
        )
        .order_by_desc(transaction_record::Column::CreatedAt)
        .order_by_desc(transaction_record::Column::Id)
        .all(ctx.db.as_ref())
        .await?;
    Ok(rows)
}
