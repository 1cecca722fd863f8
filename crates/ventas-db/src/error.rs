//! # Storage and Ledger Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)         ventas_core::CoreError             │
//! │       │                                    │                            │
//! │       ▼                                    │                            │
//! │  DbError ← Adds categorization             │                            │
//! │       │                                    │                            │
//! │       └──────────────┬─────────────────────┘                            │
//! │                      ▼                                                  │
//! │               LedgerError (what the Ledger returns)                    │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │               ApiError (apps/api) ← status code + JSON body            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use ventas_core::{CoreError, ValidationError};

// =============================================================================
// DbError
// =============================================================================

/// Storage operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and for the HTTP mapping.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in storage.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a product whose id already exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - A sale_products row referencing a product that does not exist
    /// - Deleting a sale that still has sale_products rows
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error (e.g. a stored value that no longer parses).
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl ToString) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// LedgerError
// =============================================================================

/// Errors returned by the [`Ledger`](crate::Ledger) service.
///
/// Domain failures (missing sale, unresolved products, bad input) stay
/// [`CoreError`]s; everything that went wrong in storage is a [`DbError`].
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Core(CoreError::Validation(err))
    }
}

impl LedgerError {
    /// True for `SaleNotFound`, `ProductsNotFound` and storage `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::Core(CoreError::SaleNotFound(_))
                | LedgerError::Core(CoreError::ProductsNotFound { .. })
                | LedgerError::Db(DbError::NotFound { .. })
        )
    }

    /// True for input that failed validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Core(CoreError::Validation(_)))
    }
}

/// Result type for Ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
