use crate::error::PersistDbError;
use crate::persist::PersistCtx;
use crate::util::floor_decimal;
use entities::base_balance;
use log::warn;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};

use super::common::{WalletAddress, now};

pub async fn get_base_balance(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
) -> Result<Option<base_balance::Model>, PersistDbError> {
    let row = base_balance::Entity::find_by_id(wallet.as_str().to_owned())
        .one(ctx.db.as_ref())
        .await?;
    Ok(row)
}

/// Upsert the latest chain observation for `wallet`.
///
/// `gem_balance` is derived here and only here: `floor(observed_amount)`, or
/// `"0"` when the observation is not a non-negative number. The raw string is
/// stored either way. Earlier observations are overwritten.
pub async fn record_observation(
    ctx: &PersistCtx,
    wallet: &WalletAddress,
    observed_amount: &str,
) -> Result<base_balance::Model, PersistDbError> {
    let gem_balance = match floor_decimal(observed_amount) {
        Some(gems) => gems.to_string(),
        None => {
            warn!("Unparsable balance observation {observed_amount:?} for {wallet}, storing 0 gems");
            "0".to_string()
        }
    };

    let now = now();
    let row = base_balance::ActiveModel {
        wallet_address: Set(wallet.as_str().to_owned()),
        gem_balance: Set(gem_balance),
        ron_balance: Set(observed_amount.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    base_balance::Entity::insert(row)
        .on_conflict(
            OnConflict::column(base_balance::Column::WalletAddress)
                .update_columns([
                    base_balance::Column::GemBalance,
                    base_balance::Column::RonBalance,
                    base_balance::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(ctx.db.as_ref())
        .await?;

    get_base_balance(ctx, wallet).await?.ok_or_else(|| {
        PersistDbError::InvariantViolation(format!(
            "base balance for {wallet} missing right after upsert"
        ))
    })
}
