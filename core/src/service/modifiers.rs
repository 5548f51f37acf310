use crate::{
    error::{ServiceError, ServiceResult},
    persist::{mapper, repo},
    util::parse_signed_integer,
};
use alloy::primitives::I256;
use log::info;
use rpc::{ModifierChangeRequest, ModifierEntryInfo};

use super::GemService;

/// Administrative adjustment applied to a wallet's modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierChange {
    /// replace the cumulative modifier
    Set,
    Add,
    Subtract,
}

impl ModifierChange {
    /// Amounts and deltas are signed integers for every change kind.
    fn parse_amount(self, raw: &str) -> Option<I256> {
        parse_signed_integer(raw)
    }

    fn default_description(self, amount: &str) -> String {
        match self {
            ModifierChange::Set => format!("Set modifier balance to {amount}"),
            ModifierChange::Add => format!("Added {amount} to modifier balance"),
            ModifierChange::Subtract => format!("Subtracted {amount} from modifier balance"),
        }
    }
}

impl GemService {
    /// Current modifier entry, or a zero placeholder for untouched wallets.
    /// Never writes.
    pub async fn get_modifier(&self, address: &str) -> ServiceResult<ModifierEntryInfo> {
        let wallet = repo::parse_address(address)?;
        let current = repo::get_current_modifier(self.persist_ctx(), &wallet).await?;
        Ok(current
            .map(mapper::modifier_model_to_info)
            .unwrap_or_else(|| ModifierEntryInfo::untouched(wallet.as_str())))
    }

    pub async fn get_or_initialize_modifier(
        &self,
        address: &str,
    ) -> ServiceResult<ModifierEntryInfo> {
        let wallet = repo::parse_address(address)?;
        let entry = repo::get_or_initialize_modifier(self.persist_ctx(), &wallet).await?;
        Ok(mapper::modifier_model_to_info(entry))
    }

    pub async fn get_modifier_history(&self, address: &str) -> ServiceResult<Vec<ModifierEntryInfo>> {
        let wallet = repo::parse_address(address)?;
        let limit = self.config().ledger_config.history_limit;
        let rows = repo::get_modifier_history(self.persist_ctx(), &wallet, limit).await?;
        info!("Found {} modifier history entries for {wallet}", rows.len());
        Ok(rows.into_iter().map(mapper::modifier_model_to_info).collect())
    }

    pub async fn change_modifier(
        &self,
        address: &str,
        change: ModifierChange,
        req: ModifierChangeRequest,
    ) -> ServiceResult<ModifierEntryInfo> {
        let raw_amount = req.amount.map(|a| a.to_string()).unwrap_or_default();
        let amount = change
            .parse_amount(&raw_amount)
            .ok_or_else(|| ServiceError::InvalidParams("Invalid amount".into()))?;
        let wallet = repo::parse_address(address)?;

        let description = req
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| change.default_description(&raw_amount));
        let retries = self.config().ledger_config.write_retries;
        let ctx = self.persist_ctx();

        info!("{change:?} modifier for {wallet} with {amount}");
        let entry = match change {
            ModifierChange::Set => {
                repo::set_modifier(ctx, &wallet, amount, &description, retries).await?
            }
            ModifierChange::Add => {
                repo::add_to_modifier(ctx, &wallet, amount, &description, retries).await?
            }
            ModifierChange::Subtract => {
                repo::subtract_from_modifier(ctx, &wallet, amount, &description, retries).await?
            }
        };

        Ok(mapper::modifier_model_to_info(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_change_accepts_signed_integers() {
        let minus_ten = I256::try_from(-10i64).unwrap();
        for change in [ModifierChange::Set, ModifierChange::Add, ModifierChange::Subtract] {
            assert_eq!(change.parse_amount("-10"), Some(minus_ten), "{change:?}");
            assert!(change.parse_amount("10").is_some(), "{change:?}");
            assert!(change.parse_amount("ten").is_none(), "{change:?}");
            assert!(change.parse_amount("2.5").is_none(), "{change:?}");
        }
    }

    #[test]
    fn default_descriptions_name_the_amount() {
        assert_eq!(
            ModifierChange::Set.default_description("5"),
            "Set modifier balance to 5"
        );
        assert_eq!(
            ModifierChange::Add.default_description("5"),
            "Added 5 to modifier balance"
        );
        assert_eq!(
            ModifierChange::Subtract.default_description("5"),
            "Subtracted 5 from modifier balance"
        );
    }
}
