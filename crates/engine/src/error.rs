//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an input is malformed, before anything is written.
//! - [`Unauthorized`] thrown when credentials do not match.
//! - [`NotFound`] thrown when an item is absent or owned by another account.
//! - [`Conflict`] thrown when a write would break a uniqueness or reference rule.
//! - [`TransactionFailed`] thrown when the ledger unit of work cannot commit.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`TransactionFailed`]: EngineError::TransactionFailed
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Turns storage-level constraint violations into [`EngineError::Conflict`].
    ///
    /// `context` is the message surfaced to the caller when a constraint fires.
    pub(crate) fn from_constraint(err: DbErr, context: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_))
            | Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EngineError::Conflict(context.to_string())
            }
            _ => EngineError::Database(err),
        }
    }

    /// Storage failures inside the ledger unit of work are reported as
    /// [`EngineError::TransactionFailed`]; domain errors pass through.
    pub(crate) fn into_ledger_failure(self) -> Self {
        match self {
            EngineError::Database(err) => EngineError::TransactionFailed(err.to_string()),
            other => other,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::TransactionFailed(a), Self::TransactionFailed(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_failure_wraps_database_errors() {
        let err = EngineError::Database(DbErr::Custom("disk full".to_string()));
        assert!(matches!(
            err.into_ledger_failure(),
            EngineError::TransactionFailed(msg) if msg.contains("disk full")
        ));
    }

    #[test]
    fn ledger_failure_keeps_domain_errors() {
        let err = EngineError::NotFound("wallet not exists".to_string());
        assert_eq!(
            err.into_ledger_failure(),
            EngineError::NotFound("wallet not exists".to_string())
        );
    }

    #[test]
    fn unrelated_database_errors_are_not_conflicts() {
        let err = EngineError::from_constraint(DbErr::Custom("boom".to_string()), "dup");
        assert!(matches!(err, EngineError::Database(_)));
    }
}
