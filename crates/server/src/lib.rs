use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerConfig, ServerState, router, run, run_with_listener};
pub use token::{IssuedToken, TokenIssuer};

mod auth;
mod categories;
mod exchange;
mod profile;
mod server;
mod token;
mod transactions;
mod wallets;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{LoginRequest, LoginResponse, RegisterRequest};
    }

    pub mod account {
        pub use api_types::account::{Account, PasswordChange, ProfileUpdate};
    }

    pub mod wallet {
        pub use api_types::wallet::{Wallet, WalletNew, WalletUpdate};
    }

    pub mod category {
        pub use api_types::CategoryKind;
        pub use api_types::category::{Category, CategoryNew, CategoryQuery, CategoryUpdate};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            CategoryRef, Transaction, TransactionCreated, TransactionNew, TransactionQuery,
            TransactionView, WalletRef,
        };
    }

    pub mod exchange {
        pub use api_types::exchange::ExchangeRates;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Internal(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::TransactionFailed(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::TransactionFailed(reason) => {
            tracing::error!("transaction failed: {reason}");
            "transaction failed".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized(reason) => {
                tracing::warn!("rejected request: {reason}");
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }
            ServerError::Internal(reason) => {
                tracing::error!("{reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

pub(crate) fn kind_to_engine(kind: api_types::CategoryKind) -> engine::CategoryKind {
    match kind {
        api_types::CategoryKind::Income => engine::CategoryKind::Income,
        api_types::CategoryKind::Expense => engine::CategoryKind::Expense,
    }
}

pub(crate) fn kind_from_engine(kind: engine::CategoryKind) -> api_types::CategoryKind {
    match kind {
        engine::CategoryKind::Income => api_types::CategoryKind::Income,
        engine::CategoryKind::Expense => api_types::CategoryKind::Expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_unauthorized_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthorized("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = ServerError::Unauthorized("expired".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ledger_failure_maps_to_500() {
        let res =
            ServerError::from(EngineError::TransactionFailed("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
