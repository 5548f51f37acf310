use alloy::signers::local::LocalSignerError;
use anyhow::anyhow;
use std::time::Duration;
use thiserror::Error;

// ---------- Domain/Layer error types ----------

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Chain transport failure: {0}")]
    TransportFailure(#[from] alloy::transports::TransportError),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Private key error: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid chain configuration: {0}")]
    InvalidConfig(String),

    #[error("Pending transaction failed: {0}")]
    PendingTxFailure(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Chain request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum PersistDbError {
    #[error("Database operation failed: {0}")]
    DatabaseFailure(#[from] sea_orm::DbErr),

    #[error("Invalid wallet address {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Transaction {0} is already finalized")]
    TransactionAlreadyFinal(String),

    #[error("modifier write for {wallet} kept conflicting after {attempts} attempts")]
    ModifierWriteConflict { wallet: String, attempts: u32 },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("chain unavailable: {0}")]
    ChainUnavailable(#[source] ChainError),

    #[error("transfer {transaction_id} failed: {reason}")]
    TransferFailed {
        transaction_id: String,
        reason: ChainError,
    },

    #[error("database error: {0}")]
    Db(PersistDbError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<PersistDbError> for ServiceError {
    fn from(e: PersistDbError) -> Self {
        match e {
            PersistDbError::InvalidAddress(addr) => {
                ServiceError::InvalidParams(format!("invalid wallet address {addr}"))
            }
            PersistDbError::InvalidAmount(msg) => ServiceError::InvalidParams(msg),
            PersistDbError::TransactionNotFound(id) => {
                ServiceError::NotFound(format!("Transaction {id} not found"))
            }
            PersistDbError::TransactionAlreadyFinal(id) => {
                ServiceError::Conflict(format!("Transaction {id} is already finalized"))
            }
            e @ PersistDbError::ModifierWriteConflict { .. } => {
                ServiceError::Conflict(e.to_string())
            }
            PersistDbError::InvariantViolation(msg) => ServiceError::Other(anyhow!(msg)),
            PersistDbError::DatabaseFailure(e) => {
                ServiceError::Db(PersistDbError::DatabaseFailure(e))
            }
        }
    }
}

// ---------- `From` conversions so chain code can use `?` ----------

impl From<LocalSignerError> for ChainError {
    fn from(e: LocalSignerError) -> Self {
        ChainError::InvalidPrivateKey(e.to_string())
    }
}

impl From<alloy::contract::Error> for ChainError {
    fn from(e: alloy::contract::Error) -> Self {
        ChainError::ContractCall(e.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for ChainError {
    fn from(e: alloy::providers::PendingTransactionError) -> Self {
        ChainError::PendingTxFailure(e.to_string())
    }
}
