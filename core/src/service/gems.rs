use crate::{
    config::GEMS_PER_NATIVE_UNIT,
    error::{PersistDbError, ServiceResult},
    persist::repo::{self, WalletAddress},
};
use alloy::primitives::{I256, U256};
use entities::{base_balance, modifier_entry};
use log::info;
use rpc::GemBalanceInfo;
use std::str::FromStr;

use super::GemService;

/// A wallet's displayed gem balance and its two components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeBalance {
    pub total: I256,
    pub base: U256,
    pub modifier: I256,
    /// Raw observed amount behind `base`.
    pub ron_raw: String,
}

/// `total = base + modifier`, with a missing side counting as zero.
pub fn compose(
    base: Option<&base_balance::Model>,
    modifier: Option<&modifier_entry::Model>,
) -> Result<CompositeBalance, PersistDbError> {
    let (base_gems, ron_raw) = match base {
        Some(row) => {
            let gems = U256::from_str(&row.gem_balance).map_err(|e| {
                PersistDbError::InvariantViolation(format!(
                    "stored gem balance {} for {} is not an integer: {e}",
                    row.gem_balance, row.wallet_address
                ))
            })?;
            (gems, row.ron_balance.clone())
        }
        None => (U256::ZERO, "0".to_string()),
    };

    let modifier = match modifier {
        Some(entry) => repo::parse_modifier_value(entry)?,
        None => I256::ZERO,
    };

    let total = I256::try_from(base_gems)
        .ok()
        .and_then(|base| base.checked_add(modifier))
        .ok_or_else(|| {
            PersistDbError::InvariantViolation(format!(
                "gem total overflows: {base_gems} + {modifier}"
            ))
        })?;

    Ok(CompositeBalance {
        total,
        base: base_gems,
        modifier,
        ron_raw,
    })
}

impl GemService {
    /// Pure read over the base balance mirror and the modifier ledger.
    pub async fn composite(&self, address: &str) -> ServiceResult<CompositeBalance> {
        let wallet = repo::parse_address(address)?;
        self.composite_for(&wallet).await
    }

    async fn composite_for(&self, wallet: &WalletAddress) -> ServiceResult<CompositeBalance> {
        let base = repo::get_base_balance(self.persist_ctx(), wallet).await?;
        let modifier = repo::get_current_modifier(self.persist_ctx(), wallet).await?;
        Ok(compose(base.as_ref(), modifier.as_ref())?)
    }

    pub async fn get_gem_balance(&self, address: &str) -> ServiceResult<GemBalanceInfo> {
        let wallet = repo::parse_address(address)?;
        let composite = self.composite_for(&wallet).await?;
        info!(
            "Gem balance for {wallet}: {} (base: {}, modifier: {})",
            composite.total, composite.base, composite.modifier
        );

        Ok(GemBalanceInfo {
            address: wallet.to_string(),
            gem_balance: composite.total.to_string(),
            base_gem_balance: composite.base.to_string(),
            modifier_amount: composite.modifier.to_string(),
            ron_balance: composite.ron_raw,
            conversion_rate: GEMS_PER_NATIVE_UNIT,
        })
    }
}
