use crate::{
    chain::with_timeout,
    error::{ServiceError, ServiceResult},
    persist::repo,
};
use log::{error, info, warn};
use rpc::{BalanceInfo, BalanceSource};

use super::GemService;

impl GemService {
    /// Reads the wallet's native and contract balances and mirrors the
    /// contract balance into the base balance store.
    ///
    /// A failed native read fails the whole query. A failed contract read is
    /// recorded as a zero observation and reported with `source = native`.
    pub async fn query_balance(&self, address: &str) -> ServiceResult<BalanceInfo> {
        let wallet = repo::parse_address(address)?;
        let limit = self.chain_timeout();

        let native = with_timeout(limit, self.chain().native_balance(wallet.address()))
            .await
            .map_err(|e| {
                error!("Native balance read for {wallet} failed: {e}");
                ServiceError::ChainUnavailable(e)
            })?;

        let (contract_balance, source) =
            match with_timeout(limit, self.chain().contract_balance(wallet.address())).await {
                Ok(balance) => (balance.to_string(), BalanceSource::Both),
                Err(e) => {
                    warn!("Contract balance read for {wallet} failed, using 0: {e}");
                    ("0".to_string(), BalanceSource::Native)
                }
            };

        let mirrored =
            repo::record_observation(self.persist_ctx(), &wallet, &contract_balance).await?;
        info!(
            "Balance for {wallet}: native={native}, contract={contract_balance}, gems={}",
            mirrored.gem_balance
        );

        Ok(BalanceInfo {
            address: wallet.to_string(),
            native_balance: native.to_string(),
            contract_balance,
            balance: native.to_string(),
            source,
        })
    }
}
