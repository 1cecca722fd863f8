//! # Query Layer
//!
//! Pure functions over a list of sales: the sale total, catalog resolution
//! and the four filters (product, year range, month range, day range).
//!
//! ## Filter Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Filter          Included iff                                          │
//! │  ──────────────  ─────────────────────────────────────────────────────  │
//! │  ProductFilter   sale references product_id at least once              │
//! │  YearRange       start <= sale.year <= end                             │
//! │  MonthRange      (y0, m0) <= (sale.year, sale.month) <= (y1, m1)       │
//! │  DayRange        start <= sale.date <= end                             │
//! │                                                                         │
//! │  • Every bound is INCLUSIVE                                            │
//! │  • An inverted range is not an error: it matches nothing               │
//! │  • Results keep the input order (ledger insertion order)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId, Sale};
use crate::validation::{validate_month, ValidationResult};

// =============================================================================
// Totals
// =============================================================================

/// Sum of the price of every product the sale references.
///
/// Duplicated products count once per occurrence. A sale without products
/// totals zero. Unit prices are capped at [`crate::MAX_UNIT_PRICE`], which
/// keeps any storable sale far from `Decimal` overflow.
pub fn total(sale: &Sale) -> Money {
    sale.products.iter().map(|p| p.price).sum()
}

// =============================================================================
// Catalog Resolution
// =============================================================================

/// Expands requested ids into product records, all-or-nothing.
///
/// `found` holds whatever the catalog returned for the distinct requested
/// ids. Every requested id must be present; otherwise the error lists each
/// missing id once, in request order. On success the result follows request
/// order and keeps duplicates.
pub fn resolve_products(requested: &[ProductId], found: &[Product]) -> CoreResult<Vec<Product>> {
    let by_id: HashMap<ProductId, &Product> = found.iter().map(|p| (p.id, p)).collect();

    let mut missing: Vec<ProductId> = Vec::new();
    let mut resolved = Vec::with_capacity(requested.len());

    for id in requested {
        match by_id.get(id) {
            Some(product) => resolved.push((*product).clone()),
            None if !missing.contains(id) => missing.push(*id),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(CoreError::ProductsNotFound { ids: missing });
    }

    Ok(resolved)
}

// =============================================================================
// Filters
// =============================================================================

/// A predicate over sales.
pub trait SaleFilter {
    fn matches(&self, sale: &Sale) -> bool;
}

/// Keeps the sales matched by `filter`, preserving order.
pub fn apply<F: SaleFilter + ?Sized>(sales: Vec<Sale>, filter: &F) -> Vec<Sale> {
    sales.into_iter().filter(|sale| filter.matches(sale)).collect()
}

/// Sales that reference a given product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFilter(pub ProductId);

impl SaleFilter for ProductFilter {
    fn matches(&self, sale: &Sale) -> bool {
        sale.contains_product(self.0)
    }
}

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        YearRange { start, end }
    }
}

impl SaleFilter for YearRange {
    fn matches(&self, sale: &Sale) -> bool {
        let year = sale.year();
        self.start <= year && year <= self.end
    }
}

/// Inclusive range of (year, month) pairs, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: (i32, u32),
    end: (i32, u32),
}

impl MonthRange {
    /// Builds a month range. Both months must be within 1..=12.
    pub fn new(year: i32, start_month: u32, end_year: i32, end_month: u32) -> ValidationResult<Self> {
        validate_month("startMonth", start_month)?;
        validate_month("endMonth", end_month)?;

        Ok(MonthRange {
            start: (year, start_month),
            end: (end_year, end_month),
        })
    }

    pub fn start(&self) -> (i32, u32) {
        self.start
    }

    pub fn end(&self) -> (i32, u32) {
        self.end
    }
}

impl SaleFilter for MonthRange {
    fn matches(&self, sale: &Sale) -> bool {
        let key = (sale.year(), sale.month());
        self.start <= key && key <= self.end
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DayRange { start, end }
    }
}

impl SaleFilter for DayRange {
    fn matches(&self, sale: &Sale) -> bool {
        self.start <= sale.date && sale.date <= self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
