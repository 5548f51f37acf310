use crate::error::ChainError;
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

pub mod contract;
pub mod proxy;

pub use proxy::RoninChainProxy;

/// Everything the service needs from the chain. Amounts are in wei.
#[async_trait]
pub trait ChainApi: Send + Sync {
    async fn native_balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Balance the wallet holds inside the balance-payments contract.
    async fn contract_balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Submits a plain value transfer and waits for its receipt.
    async fn send_native_transfer(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, ChainError>;
}

/// Bounds a chain call; hitting the limit is reported as `ChainError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ChainError>
where
    F: Future<Output = Result<T, ChainError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ChainError::Timeout(limit))?
}
