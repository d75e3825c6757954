//! Error handling utilities for repositories

use dw_core::error::DomainError;
use sqlx::Error as SqlxError;

/// SQLSTATE for "function does not exist"
const UNDEFINED_FUNCTION: &str = "42883";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Convert SQLx error on a reaction read to DomainError
pub fn map_fetch_error(e: SqlxError) -> DomainError {
    DomainError::ReactionFetch(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a failed analytics call, treating a missing function as unavailable
pub fn map_rpc_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some(UNDEFINED_FUNCTION) {
            return DomainError::AnalyticsUnavailable(db_err.message().to_string());
        }
    }
    DomainError::AnalyticsUnavailable(e.to_string())
}
