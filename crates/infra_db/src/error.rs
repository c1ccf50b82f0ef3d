//! Database error types
//!
//! This module defines the error types that can occur during database operations
//! and their translation into the domain's `PortError`.

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation (e.g. a negative salary)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store aborted the transaction because of a concurrent change
    #[error("Serialization conflict: {0}")]
    SerializationConflict(String),

    /// A tracked change matched no row; the row changed or vanished since it was read
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A row could not be mapped onto a domain type
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[source] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Company", 999);
    /// assert!(error.to_string().contains("Company"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::ForeignKeyViolation(_) | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Database errors are classified by their PostgreSQL SQLSTATE code.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23503") => DatabaseError::ForeignKeyViolation(message),
                    Some("23514") => DatabaseError::ConstraintViolation(message),
                    Some("40001") | Some("40P01") => DatabaseError::SerializationConflict(message),
                    Some("25P02") => DatabaseError::TransactionFailed(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::SqlError(error),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<MoneyError> for DatabaseError {
    fn from(error: MoneyError) -> Self {
        DatabaseError::MappingError(error.to_string())
    }
}

/// Translates database errors into the port error seen by the domain
///
/// - `NotFound` -> `PortError::NotFound`
/// - connection problems -> `PortError::Connection`
/// - constraint and concurrency problems -> `PortError::Conflict`
/// - everything else -> `PortError::Internal`
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, id } => PortError::NotFound {
                entity_type: entity,
                id,
            },
            error if error.is_connection_error() => PortError::Connection {
                message: error.to_string(),
                source: Some(Box::new(error)),
            },
            error if error.is_constraint_violation() => PortError::conflict(error.to_string()),
            DatabaseError::SerializationConflict(_) | DatabaseError::ConcurrencyConflict(_) => {
                PortError::conflict(error.to_string())
            }
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port: PortError = DatabaseError::not_found("Company", 999).into();
        assert!(port.is_not_found());
        assert!(port.to_string().contains("999"));
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());
        let port: PortError = error.into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_concurrency_conflict_maps_to_conflict() {
        let port: PortError = DatabaseError::ConcurrencyConflict("company 1".to_string()).into();
        assert!(matches!(port, PortError::Conflict { .. }));
    }

    #[test]
    fn test_check_violation_maps_to_conflict() {
        let error = DatabaseError::ConstraintViolation("salary >= 0".to_string());
        assert!(error.is_constraint_violation());
        let port: PortError = error.into();
        assert!(matches!(port, PortError::Conflict { .. }));
    }

    #[test]
    fn test_row_not_found_is_generic_sql_error() {
        let error = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, DatabaseError::SqlError(_)));
        assert!(!error.is_not_found());
    }
}
