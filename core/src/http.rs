use crate::{
    error::ServiceError,
    rate_limit::{self, RateLimiter},
    service::{GemService, ModifierChange},
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use rpc::{
    BalanceInfo, CreateTransactionRequest, GemBalanceInfo, ModifierChangeRequest,
    ModifierEntryInfo, TransactionInfo,
};
use serde_json::{Map, Value, json};
use tower_http::set_header::SetResponseHeaderLayer;

/// All routes live under `/api`. Everything except the health check is
/// rate limited per client. Every response carries the basic hardening
/// headers.
pub fn router(service: GemService) -> Router {
    let limiter = RateLimiter::new(&service.config().rate_limit_config);

    let api = Router::new()
        .route("/balance/{address}", get(get_balance))
        .route("/gems/{address}", get(get_gems))
        .route("/modifiers/set/{address}", post(set_modifier))
        .route("/modifiers/{address}", get(get_modifier))
        .route("/modifiers/{address}/history", get(get_modifier_history))
        .route("/modifiers/{address}/add", post(add_to_modifier))
        .route("/modifiers/{address}/subtract", post(subtract_from_modifier))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{address}", get(list_transactions))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .route("/health", get(get_health));

    Router::new()
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .with_state(service)
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    extra: Map<String, Value>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Server-side failures are reported with the endpoint's own message;
    /// client errors keep their specific one.
    fn context(mut self, message: &str) -> Self {
        if self.status.is_server_error() {
            self.message = message.to_string();
        }
        self
    }

    /// Zeroed payload so callers always see the endpoint's usual fields.
    fn fallback(mut self, payload: Value) -> Self {
        if let Value::Object(fields) = payload {
            self.extra.extend(fields);
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.message));
        body.extend(self.extra);
        (self.status, Json(Value::Object(body))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidParams(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            ServiceError::ChainUnavailable(e) => {
                error!("chain unavailable: {e}");
                ApiError::new(StatusCode::BAD_GATEWAY, "chain unavailable")
            }
            ServiceError::TransferFailed {
                transaction_id,
                reason,
            } => {
                error!("transfer {transaction_id} failed: {reason}");
                let mut api_err =
                    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "transfer failed");
                api_err
                    .extra
                    .insert("transactionId".to_string(), Value::String(transaction_id));
                api_err
            }
            ServiceError::Db(e) => {
                error!("database error: {e}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            ServiceError::Other(e) => {
                error!("internal error: {e:#}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })
}

async fn get_health(State(service): State<GemService>) -> Response {
    let report = service.run_health_checks().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report)).into_response()
}

async fn get_balance(
    State(service): State<GemService>,
    Path(address): Path<String>,
) -> Result<Json<BalanceInfo>, ApiError> {
    info!("Balance requested for {address}");
    let balance = service.query_balance(&address).await.map_err(|e| {
        ApiError::from(e)
            .context("Failed to fetch balance")
            .fallback(json!({
                "nativeBalance": "0",
                "contractBalance": "0",
                "balance": "0",
            }))
    })?;
    Ok(Json(balance))
}

async fn get_gems(
    State(service): State<GemService>,
    Path(address): Path<String>,
) -> Result<Json<GemBalanceInfo>, ApiError> {
    info!("Gem balance requested for {address}");
    let gems = service.get_gem_balance(&address).await.map_err(|e| {
        ApiError::from(e)
            .context("Failed to fetch gem balance")
            .fallback(json!({
                "gemBalance": "0",
                "baseGemBalance": "0",
                "modifierAmount": "0",
                "ronBalance": "0",
            }))
    })?;
    Ok(Json(gems))
}

async fn get_modifier(
    State(service): State<GemService>,
    Path(address): Path<String>,
) -> Result<Json<ModifierEntryInfo>, ApiError> {
    info!("Modifier requested for {address}");
    let entry = service
        .get_modifier(&address)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to get modifier balance"))?;
    Ok(Json(entry))
}

async fn get_modifier_history(
    State(service): State<GemService>,
    Path(address): Path<String>,
) -> Result<Json<Vec<ModifierEntryInfo>>, ApiError> {
    info!("Modifier history requested for {address}");
    let history = service
        .get_modifier_history(&address)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to get modifier balance history"))?;
    Ok(Json(history))
}

async fn apply_modifier_change(
    service: GemService,
    address: String,
    change: ModifierChange,
    payload: Result<Json<ModifierChangeRequest>, JsonRejection>,
    failure: &str,
) -> Result<Json<ModifierEntryInfo>, ApiError> {
    info!("Modifier change {change:?} requested for {address}");
    let req = json_body(payload)?;
    let entry = service
        .change_modifier(&address, change, req)
        .await
        .map_err(|e| ApiError::from(e).context(failure))?;
    Ok(Json(entry))
}

async fn set_modifier(
    State(service): State<GemService>,
    Path(address): Path<String>,
    payload: Result<Json<ModifierChangeRequest>, JsonRejection>,
) -> Result<Json<ModifierEntryInfo>, ApiError> {
    apply_modifier_change(
        service,
        address,
        ModifierChange::Set,
        payload,
        "Failed to set modifier balance",
    )
    .await
}

async fn add_to_modifier(
    State(service): State<GemService>,
    Path(address): Path<String>,
    payload: Result<Json<ModifierChangeRequest>, JsonRejection>,
) -> Result<Json<ModifierEntryInfo>, ApiError> {
    apply_modifier_change(
        service,
        address,
        ModifierChange::Add,
        payload,
        "Failed to add to modifier balance",
    )
    .await
}

async fn subtract_from_modifier(
    State(service): State<GemService>,
    Path(address): Path<String>,
    payload: Result<Json<ModifierChangeRequest>, JsonRejection>,
) -> Result<Json<ModifierEntryInfo>, ApiError> {
    apply_modifier_change(
        service,
        address,
        ModifierChange::Subtract,
        payload,
        "Failed to subtract from modifier balance",
    )
    .await
}

async fn create_transaction(
    State(service): State<GemService>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionInfo>), ApiError> {
    let req = json_body(payload)?;
    info!(
        "Transfer requested: {} -> {} ({})",
        req.from_address, req.to_address, req.amount
    );
    let record = service
        .create_transaction(req)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to process transaction"))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_transactions(
    State(service): State<GemService>,
    Path(address): Path<String>,
) -> Result<Json<Vec<TransactionInfo>>, ApiError> {
    info!("Transaction history requested for {address}");
    let records = service
        .list_transactions(&address)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to fetch transactions"))?;
    Ok(Json(records))
}
