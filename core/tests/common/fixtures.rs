use anyhow::Result;
use gem_service::{
    config::{
        AppConfig, ChainConfig, DatabaseConfig, LedgerConfig, RateLimitConfig, ServerConfig,
    },
    persist::{PersistCtx, repo::WalletAddress},
};
use migration::{Migrator, MigratorTrait};
use rand::random;
use sea_orm::{ConnectOptions, Database};

pub fn build_config() -> AppConfig {
    AppConfig {
        server_config: ServerConfig {
            host: "127.0.0.1".into(),
            port: "3001".into(),
            log_level: log::Level::Info,
        },
        database_config: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            run_migrations: true,
        },
        chain_config: ChainConfig {
            rpc_url: "http://localhost:8545".into(),
            contract_address: "0x0000000000000000000000000000000000000001".into(),
            product_type: "1".into(),
            product_id: "2".into(),
            private_key: None,
            request_timeout_secs: 2,
        },
        ledger_config: LedgerConfig::default(),
        rate_limit_config: RateLimitConfig::default(),
    }
}

/// In-memory store pinned to a single connection so every handle sees the
/// same database.
pub async fn init_persist() -> Result<PersistCtx> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(PersistCtx::from_conn(db))
}

pub fn random_address() -> String {
    format!("0x{:040x}", random::<u128>())
}

pub fn random_wallet() -> WalletAddress {
    WalletAddress::parse(random_address()).expect("random address is valid")
}
