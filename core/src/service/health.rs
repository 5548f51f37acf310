use log::error;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::service::GemService;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Fail,
}

impl From<bool> for CheckStatus {
    fn from(value: bool) -> Self {
        if value {
            CheckStatus::Ok
        } else {
            CheckStatus::Fail
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: CheckStatus,
    pub db: CheckStatus,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status, CheckStatus::Ok)
    }
}

impl GemService {
    /// Probes the store only; the chain node is not consulted.
    pub async fn run_health_checks(&self) -> HealthReport {
        let db_ok = self.check_db().await;
        HealthReport {
            status: db_ok.into(),
            db: db_ok.into(),
        }
    }

    async fn check_db(&self) -> bool {
        let db = self.persist_ctx().db.as_ref();
        let stmt = sea_orm::Statement::from_string(db.get_database_backend(), "SELECT 1");
        match db.query_one(stmt).await {
            Ok(_) => true,
            Err(e) => {
                error!("DB health check failed: {e}");
                false
            }
        }
    }
}
