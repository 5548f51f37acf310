use crate::chain::ChainApi;
use crate::chain::contract::BalancePayments;
use crate::config::{ChainConfig, NATIVE_TRANSFER_GAS_LIMIT};
use crate::error::ChainError;
use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use log::info;
use std::str::FromStr;

/// HTTP-backed Ronin client: native balances, the balance-payments contract
/// and plain value transfers.
pub struct RoninChainProxy {
    provider: DynProvider,
    contract_address: Address,
    product_type: U256,
    product_id: U256,
}

impl RoninChainProxy {
    pub async fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        let contract_address = Address::from_str(&config.contract_address)
            .map_err(|_| ChainError::InvalidAddress(config.contract_address.clone()))?;
        let product_type = U256::from_str(&config.product_type)
            .map_err(|e| ChainError::InvalidConfig(format!("product type: {e}")))?;
        let product_id = U256::from_str(&config.product_id)
            .map_err(|e| ChainError::InvalidConfig(format!("product id: {e}")))?;

        let provider = match config.private_key.as_deref() {
            Some(key) => {
                let signer: PrivateKeySigner = key.parse()?;
                info!("Signing transfers locally as {}", signer.address());
                ProviderBuilder::new()
                    .wallet(EthereumWallet::new(signer))
                    .connect(&config.rpc_url)
                    .await?
                    .erased()
            }
            None => ProviderBuilder::new()
                .connect(&config.rpc_url)
                .await?
                .erased(),
        };

        Ok(Self {
            provider,
            contract_address,
            product_type,
            product_id,
        })
    }

    fn build_contract(&self) -> BalancePayments::BalancePaymentsInstance<DynProvider> {
        BalancePayments::BalancePaymentsInstance::new(self.contract_address, self.provider.clone())
    }
}

/// The contract keys balances by entity id; a wallet's id is its address
/// read as a big-endian uint256.
pub fn entity_id(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

#[async_trait]
impl ChainApi for RoninChainProxy {
    async fn native_balance(&self, address: Address) -> Result<U256, ChainError> {
        let balance = self.provider.get_balance(address).await?;
        Ok(balance)
    }

    async fn contract_balance(&self, address: Address) -> Result<U256, ChainError> {
        let balance = self
            .build_contract()
            .balances(self.product_type, self.product_id, entity_id(address))
            .call()
            .await?;
        Ok(balance)
    }

    async fn send_native_transfer(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, ChainError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(value)
            .with_gas_limit(NATIVE_TRANSFER_GAS_LIMIT);

        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        if !receipt.status() {
            return Err(ChainError::Reverted(receipt.transaction_hash.to_string()));
        }

        info!("Native transfer {from} -> {to} confirmed in tx {:?}", receipt.transaction_hash);
        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_is_the_address_as_an_integer() {
        let address = Address::from_str("0x0000000000000000000000000000000000000100").unwrap();
        assert_eq!(entity_id(address), U256::from(256u64));
        assert_eq!(entity_id(Address::ZERO), U256::ZERO);
    }
}
