use crate::config::INITIAL_MODIFIER_DESCRIPTION;
use crate::error::PersistDbError;
use crate::persist::PersistCtx;
use alloy::primitives::I256;
use entities::modifier_entry;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use super::common::{WalletAddress, now};

/// Newest ledger entry for `wallet`, which carries its current modifier.
pub async fn get_current_modifier(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
) -> Result<Option<modifier_entry::Model>, PersistDbError> {
    let row = modifier_entry::Entity::find()
        .filter(modifier_entry::Column::WalletAddress.eq(wallet.as_str()))
        .order_by_desc(modifier_entry::Column::Sequence)
        .one(ctx.db.as_ref())
        .await?;
    Ok(row)
}

/// Returns the current entry, creating the zero "Initial balance" entry when
/// the wallet has never been touched. Safe to call concurrently: every caller
/// competes for sequence 0 and the losers read the winner's row.
pub async fn get_or_initialize_modifier(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
) -> Result<modifier_entry::Model, PersistDbError> {
    if let Some(current) = get_current_modifier(ctx, wallet).await? {
        return Ok(current);
    }

    insert_entry(ctx, wallet, 0, I256::ZERO, INITIAL_MODIFIER_DESCRIPTION).await?;

    get_current_modifier(ctx, wallet).await?.ok_or_else(|| {
        PersistDbError::InvariantViolation(format!(
            "modifier entry for {wallet} missing right after initialization"
        ))
    })
}

pub async fn set_modifier(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    amount: I256,
    description: &str,
    max_attempts: u32,
) -> Result<modifier_entry::Model, PersistDbError> {
    append_entry(ctx, wallet, description, max_attempts, |_| Ok(amount)).await
}

pub async fn add_to_modifier(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    delta: I256,
    description: &str,
    max_attempts: u32,
) -> Result<modifier_entry::Model, PersistDbError> {
    append_entry(ctx, wallet, description, max_attempts, |current| {
        current
            .checked_add(delta)
            .ok_or_else(|| PersistDbError::InvalidAmount("modifier overflow".into()))
    })
    .await
}

/// The cumulative modifier is allowed to go negative.
pub async fn subtract_from_modifier(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    delta: I256,
    description: &str,
    max_attempts: u32,
) -> Result<modifier_entry::Model, PersistDbError> {
    append_entry(ctx, wallet, description, max_attempts, |current| {
        current
            .checked_sub(delta)
            .ok_or_else(|| PersistDbError::InvalidAmount("modifier underflow".into()))
    })
    .await
}

pub async fn get_modifier_history(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    limit: u64,
) -> Result<Vec<modifier_entry::Model>, PersistDbError> {
    let rows = modifier_entry::Entity::find()
        .filter(modifier_entry::Column::WalletAddress.eq(wallet.as_str()))
        .order_by_desc(modifier_entry::Column::Sequence)
        .limit(limit)
        .all(ctx.db.as_ref())
        .await?;
    Ok(rows)
}

pub fn parse_modifier_value(entry: &modifier_entry::Model) -> Result<I256, PersistDbError> {
    I256::from_dec_str(&entry.gem_modifier).map_err(|e| {
        PersistDbError::InvariantViolation(format!(
            "stored modifier {} for {} (sequence {}) is not an integer: {e}",
            entry.gem_modifier, entry.wallet_address, entry.sequence
        ))
    })
}

/// Read-modify-append with optimistic concurrency.
///
/// The next entry claims `current.sequence + 1`; if another writer claimed it
/// first, the insert is a no-op and the whole step is retried against the new
/// head, so no concurrent update is ever lost.
async fn append_entry<F>(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    description: &str,
    max_attempts: u32,
    next_value: F,
) -> Result<modifier_entry::Model, PersistDbError>
where
    F: Fn(I256) -> Result<I256, PersistDbError>,
{
    let attempts = max_attempts.max(1);

    for attempt in 1..=attempts {
        let (current_value, sequence) = match get_current_modifier(ctx, wallet).await? {
            Some(current) => (parse_modifier_value(&current)?, current.sequence + 1),
            None => (I256::ZERO, 0),
        };
        let value = next_value(current_value)?;

        if insert_entry(ctx, wallet, sequence, value, description).await? {
            return modifier_entry::Entity::find_by_id((wallet.as_str().to_owned(), sequence))
                .one(ctx.db.as_ref())
                .await?
                .ok_or_else(|| {
                    PersistDbError::InvariantViolation(format!(
                        "modifier entry {sequence} for {wallet} missing right after insert"
                    ))
                });
        }

        debug!("Modifier sequence {sequence} for {wallet} was taken (attempt {attempt}/{attempts})");
    }

    Err(PersistDbError::ModifierWriteConflict {
        wallet: wallet.to_string(),
        attempts,
    })
}

/// Returns `false` when `(wallet, sequence)` already exists.
async fn insert_entry(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    sequence: i64,
    value: I256,
    description: &str,
) -> Result<bool, PersistDbError> {
    let now = now();
    let entry = modifier_entry::ActiveModel {
        wallet_address: Set(wallet.as_str().to_owned()),
        sequence: Set(sequence),
        gem_modifier: Set(value.to_string()),
        description: Set(description.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows_affected = modifier_entry::Entity::insert(entry)
        .on_conflict(
            OnConflict::columns([
                modifier_entry::Column::WalletAddress,
                modifier_entry::Column::Sequence,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(ctx.db.as_ref())
        .await?;

    Ok(rows_affected == 1)
}
