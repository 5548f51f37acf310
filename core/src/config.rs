use anyhow::Context;
use envconfig::Envconfig;
use std::time::Duration;

/// Display conversion rate: gems credited per whole native unit.
pub const GEMS_PER_NATIVE_UNIT: u64 = 1000;

pub const INITIAL_MODIFIER_DESCRIPTION: &str = "Initial balance";

pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;

#[derive(Debug, Clone, Envconfig)]
pub struct ServerConfig {
    #[envconfig(from = "SERVER_HOST", default = "127.0.0.1")]
    pub host: String,

    #[envconfig(from = "SERVER_PORT", default = "3001")]
    pub port: String,

    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: log::Level,
}

#[derive(Debug, Clone, Envconfig)]
pub struct DatabaseConfig {
    #[envconfig(from = "DATABASE_URL")]
    pub url: String,

    #[envconfig(from = "DATABASE_MAX_CONNECTIONS", default = "10")]
    pub max_connections: u32,

    #[envconfig(from = "DATABASE_RUN_MIGRATIONS", default = "true")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Envconfig)]
pub struct ChainConfig {
    #[envconfig(
        from = "CHAIN_RPC_URL",
        default = "https://saigon-testnet.roninchain.com/rpc"
    )]
    pub rpc_url: String,

    #[envconfig(from = "CHAIN_CONTRACT_ADDRESS")]
    pub contract_address: String,

    #[envconfig(
        from = "CHAIN_PRODUCT_TYPE",
        default = "49142716512428989480544990891951778026923736340389104044832350309467730665601"
    )]
    pub product_type: String,

    #[envconfig(
        from = "CHAIN_PRODUCT_ID",
        default = "24933023185053730017657803593993390280866285546389344822111420249874978831297"
    )]
    pub product_id: String,

    /// When unset, transfers are handed to the node via `eth_sendTransaction`.
    #[envconfig(from = "CHAIN_PRIVATE_KEY")]
    pub private_key: Option<String>,

    #[envconfig(from = "CHAIN_REQUEST_TIMEOUT_SECS", default = "15")]
    pub request_timeout_secs: u64,
}

impl ChainConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Envconfig)]
pub struct LedgerConfig {
    #[envconfig(from = "MODIFIER_HISTORY_LIMIT", default = "50")]
    pub history_limit: u64,

    #[envconfig(from = "MODIFIER_WRITE_RETRIES", default = "5")]
    pub write_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            write_retries: 5,
        }
    }
}

#[derive(Debug, Clone, Envconfig)]
pub struct RateLimitConfig {
    #[envconfig(from = "RATE_LIMIT_MAX_REQUESTS", default = "100")]
    pub max_requests: u32,

    #[envconfig(from = "RATE_LIMIT_WINDOW_SECS", default = "900")]
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 900,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_config: ServerConfig,
    pub database_config: DatabaseConfig,
    pub chain_config: ChainConfig,
    pub ledger_config: LedgerConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppConfig {
    pub fn fetch() -> anyhow::Result<Self> {
        let server_config = ServerConfig::init_from_env().context("Failed to load server config")?;
        let database_config =
            DatabaseConfig::init_from_env().context("Failed to load database config")?;
        let chain_config = ChainConfig::init_from_env().context("Failed to load chain config")?;
        let ledger_config = LedgerConfig::init_from_env().context("Failed to load ledger config")?;
        let rate_limit_config =
            RateLimitConfig::init_from_env().context("Failed to load rate limit config")?;

        Ok(Self {
            server_config,
            database_config,
            chain_config,
            ledger_config,
            rate_limit_config,
        })
    }
}
