//! # Error Types
//!
//! Domain-specific error types for ventas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ventas-core errors (this file)                                        │
//! │  ├── CoreError        - Missing sales/products, wrapped validation     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ventas-db errors (separate crate)                                     │
//! │  ├── DbError          - Storage operation failures                     │
//! │  └── LedgerError      - CoreError | DbError                            │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{ProductId, SaleId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more product ids have no catalog record.
    ///
    /// ## When This Occurs
    /// - Creating a sale that references an unknown product
    /// - Resolution is all-or-nothing: every missing id is listed
    #[error("Products not found: {}", format_ids(.ids))]
    ProductsNotFound { ids: Vec<ProductId> },

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements. They always map
/// to a 400-class response at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed date, non-numeric path segment).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A sale was submitted without products.
    #[error("A sale must contain at least one product")]
    EmptyProductList,

    /// Replacement products could not all be resolved.
    #[error("Some products were not found: {}", format_ids(.ids))]
    UnresolvedProducts { ids: Vec<ProductId> },
}

impl ValidationError {
    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn format_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
