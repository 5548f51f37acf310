use crate::{
    chain::with_timeout,
    error::{ServiceError, ServiceResult},
    persist::{mapper, repo, repo::TransferOutcome},
    util::parse_native_amount,
};
use log::{error, info};
use rpc::{CreateTransactionRequest, TransactionInfo};

use super::GemService;

impl GemService {
    /// Records a pending transfer, submits it on-chain and finalizes the
    /// record with the outcome. On failure the record is left `failed` and
    /// its id is returned inside `ServiceError::TransferFailed`.
    pub async fn create_transaction(
        &self,
        req: CreateTransactionRequest,
    ) -> ServiceResult<TransactionInfo> {
        let amount = req.amount.to_string();
        let value = parse_native_amount(&amount)
            .ok_or_else(|| ServiceError::InvalidParams("Invalid amount".into()))?;
        let from = repo::parse_address(&req.from_address)?;
        let to = repo::parse_address(&req.to_address)?;
        let ctx = self.persist_ctx();

        let pending = repo::create_pending_transaction(ctx, &from, &to, &amount).await?;
        info!(
            "Transaction {} created: {from} -> {to} ({amount})",
            pending.id
        );

        let sent = with_timeout(
            self.chain_timeout(),
            self.chain()
                .send_native_transfer(from.address(), to.address(), value),
        )
        .await;

        match sent {
            Ok(tx_hash) => {
                let record = repo::finalize_transaction(
                    ctx,
                    &pending.id,
                    TransferOutcome::Completed {
                        tx_hash: tx_hash.to_string(),
                    },
                )
                .await?;
                info!("Transaction {} completed in {tx_hash}", record.id);
                Ok(mapper::transaction_model_to_info(record))
            }
            Err(reason) => {
                error!("Transaction {} failed on-chain: {reason}", pending.id);
                if let Err(e) =
                    repo::finalize_transaction(ctx, &pending.id, TransferOutcome::Failed).await
                {
                    error!("Could not mark transaction {} as failed: {e}", pending.id);
                }
                Err(ServiceError::TransferFailed {
                    transaction_id: pending.id,
                    reason,
                })
            }
        }
    }

    pub async fn list_transactions(&self, address: &str) -> ServiceResult<Vec<TransactionInfo>> {
        let wallet = repo::parse_address(address)?;
        let rows = repo::get_transactions_for_address(self.persist_ctx(), &wallet).await?;
        Ok(rows
            .into_iter()
            .map(mapper::transaction_model_to_info)
            .collect())
    }
}
