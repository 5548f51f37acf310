use alloy::primitives::{Address, B256, U256};
use anyhow::Result;
use async_trait::async_trait;
use gem_service::{
    chain::ChainApi, config::AppConfig, error::ChainError, persist::PersistCtx,
    service::GemService,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::fixtures::{build_config, init_persist};

/// Scriptable chain: `None` in a slot makes that call fail.
pub struct MockChain {
    pub native_balance: Mutex<Option<U256>>,
    pub contract_balance: Mutex<Option<U256>>,
    pub transfer_hash: Mutex<Option<B256>>,
    pub delay: Mutex<Option<Duration>>,
    pub transfers: Mutex<Vec<(Address, Address, U256)>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            native_balance: Mutex::new(Some(U256::ZERO)),
            contract_balance: Mutex::new(Some(U256::ZERO)),
            transfer_hash: Mutex::new(Some(B256::repeat_byte(0xab))),
            delay: Mutex::new(None),
            transfers: Mutex::new(Vec::new()),
        }
    }
}

impl MockChain {
    async fn maybe_stall(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChainApi for MockChain {
    async fn native_balance(&self, _address: Address) -> Result<U256, ChainError> {
        self.maybe_stall().await;
        let balance = *self.native_balance.lock();
        balance.ok_or_else(|| ChainError::PendingTxFailure("node unreachable".into()))
    }

    async fn contract_balance(&self, _address: Address) -> Result<U256, ChainError> {
        self.maybe_stall().await;
        let balance = *self.contract_balance.lock();
        balance.ok_or_else(|| ChainError::ContractCall("execution reverted".into()))
    }

    async fn send_native_transfer(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, ChainError> {
        self.maybe_stall().await;
        self.transfers.lock().push((from, to, value));
        let hash = *self.transfer_hash.lock();
        hash.ok_or_else(|| ChainError::Reverted("insufficient funds".into()))
    }
}

pub struct TestEnv {
    pub service: GemService,
    pub chain: Arc<MockChain>,
    pub ctx: PersistCtx,
}

pub async fn setup_with_config(config: AppConfig) -> Result<TestEnv> {
    let ctx = init_persist().await?;
    let chain = Arc::new(MockChain::default());
    let service = GemService::new_with_dependencies(config, ctx.clone(), chain.clone());
    Ok(TestEnv {
        service,
        chain,
        ctx,
    })
}

pub async fn setup() -> Result<TestEnv> {
    setup_with_config(build_config()).await
}
