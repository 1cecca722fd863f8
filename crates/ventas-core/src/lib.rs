//! # ventas-core: Pure Business Logic for Ventas
//!
//! This crate is the **heart** of Ventas. It contains the domain types, the
//! sale total rule and the date-range query semantics as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ventas Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    REST API (axum, apps/api)                    │   │
//! │  │   /api/productos  /api/ventas  /api/ventaanual  /api/ventadiaria│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ventas-db (Ledger + storage backends)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ventas-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   query   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ YearRange │  │  dates    │  │   │
//! │  │   │   Sale    │  │ (Decimal) │  │ DayRange  │  │  ranges   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SalePatch)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and path-segment parsing
//! - [`query`] - Sale totals and the product/year/month/day filters
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ventas_core::{query, Money, Product, Sale};
//!
//! let coffee = Product::new(1, "Café", "15.00".parse().unwrap());
//! let cake = Product::new(2, "Cake", "25.00".parse().unwrap());
//! let date = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
//! let sale = Sale::new(1, vec![coffee, cake], date);
//!
//! assert_eq!(query::total(&sale), "40.00".parse::<Money>().unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use query::{DayRange, MonthRange, ProductFilter, SaleFilter, YearRange};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name (after trimming).
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Largest accepted unit price, in whole currency units.
///
/// `Decimal` holds magnitudes up to about 7.9e28, so a sale would need more
/// than 1e19 units at this price before its total could overflow.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// Text format accepted for sale dates in request bodies.
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d";
