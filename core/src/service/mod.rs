use crate::{
    chain::{ChainApi, RoninChainProxy},
    config::AppConfig,
    persist::PersistCtx,
};
use anyhow::anyhow;
use log::info;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use std::time::Duration;

mod balance;
pub mod gems;
pub mod health;
mod modifiers;
mod transactions;

pub use gems::{CompositeBalance, compose};
pub use modifiers::ModifierChange;

pub struct Inner {
    config: AppConfig,
    persist_ctx: PersistCtx,
    chain: Arc<dyn ChainApi>,
}

/// Process-wide context shared by every request handler.
#[derive(Clone)]
pub struct GemService {
    inner: Arc<Inner>,
}

impl GemService {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let persist_ctx = PersistCtx::connect(&config.database_config).await?;
        if config.database_config.run_migrations {
            Migrator::up(persist_ctx.db.as_ref(), None).await?;
            info!("Database migrations applied");
        }

        let chain = RoninChainProxy::new(&config.chain_config)
            .await
            .map_err(|e| anyhow!("failed to build chain client: {e}"))?;
        info!(
            "Chain client ready (rpc={}, contract={})",
            config.chain_config.rpc_url, config.chain_config.contract_address
        );

        Ok(Self::new_with_dependencies(
            config,
            persist_ctx,
            Arc::new(chain),
        ))
    }

    pub fn new_with_dependencies(
        config: AppConfig,
        persist_ctx: PersistCtx,
        chain: Arc<dyn ChainApi>,
    ) -> Self {
        let inner = Inner {
            config,
            persist_ctx,
            chain,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn persist_ctx(&self) -> &PersistCtx {
        &self.inner.persist_ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    fn chain(&self) -> &dyn ChainApi {
        self.inner.chain.as_ref()
    }

    fn chain_timeout(&self) -> Duration {
        self.inner.config.chain_config.request_timeout()
    }
}
