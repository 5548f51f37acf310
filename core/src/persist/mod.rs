use crate::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;

pub mod mapper;
pub mod repo;

#[derive(Clone)]
pub struct PersistCtx {
    pub db: Arc<DatabaseConnection>,
}

impl PersistCtx {
    /// Open a pooled connection using the configured `DATABASE_URL`.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .sqlx_logging(false);
        let db = Database::connect(options).await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Inject an existing `DatabaseConnection`.
    pub fn from_conn(conn: DatabaseConnection) -> Self {
        Self { db: Arc::new(conn) }
    }
}
