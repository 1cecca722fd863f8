//! # Domain Types
//!
//! Core domain types used throughout Ventas.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────┐               │
//! │  │    Product      │  n..m  │          Sale            │               │
//! │  │  ─────────────  │◄───────│  ──────────────────────  │               │
//! │  │  id (i64)       │        │  id (i64, store-assigned)│               │
//! │  │  name           │        │  products (resolved)     │               │
//! │  │  price (Money)  │        │  date (NaiveDate)        │               │
//! │  └─────────────────┘        └──────────────────────────┘               │
//! │                                                                         │
//! │  Total is DERIVED (query::total), never stored.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Product References
//! A sale stores product *ids*; storage backends resolve them to full
//! [`Product`] records whenever a sale is read. The same id may appear more
//! than once: each occurrence is one unit sold.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Catalog identifier, assigned outside the system.
pub type ProductId = i64;

/// Sale identifier, assigned by the store on creation.
pub type SaleId = i64;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry that can be sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price, exact decimal, never negative.
    pub price: Money,
}

impl Product {
    /// Creates a product record.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale of one or more products on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,

    /// Resolved product records, in the order they were supplied.
    /// Duplicates are multiple units of the same product.
    pub products: Vec<Product>,

    pub date: NaiveDate,
}

impl Sale {
    pub fn new(id: SaleId, products: Vec<Product>, date: NaiveDate) -> Self {
        Sale { id, products, date }
    }

    /// Ids of the referenced products, duplicates included.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }

    /// Whether the sale references `product_id` at least once.
    pub fn contains_product(&self, product_id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

// =============================================================================
// Sale Patch
// =============================================================================

/// Partial update of a sale. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalePatch {
    pub date: Option<NaiveDate>,
    pub product_ids: Option<Vec<ProductId>>,
}

impl SalePatch {
    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.product_ids.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
