//! # Validation Module
//!
//! Input validation and path-segment parsing for Ventas.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── Numeric {id} segments                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Sale dates (YYYY-MM-DD, real calendar dates)                      │
//! │  ├── Range segments ("2023-2024", "2023-3-2023-5", ...)                │
//! │  └── Product names, prices, non-empty product lists                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ventas_core::validation::{parse_sale_date, parse_year_range};
//!
//! let date = parse_sale_date("2023-03-10").unwrap();
//! assert_eq!(date.to_string(), "2023-03-10");
//!
//! let range = parse_year_range("2023-2024").unwrap();
//! assert_eq!((range.start, range.end), (2023, 2024));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::query::{DayRange, MonthRange, YearRange};
use crate::types::ProductId;
use crate::{MAX_PRODUCT_NAME_LEN, MAX_UNIT_PRICE, SALE_DATE_FORMAT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
///
/// Prices above [`MAX_UNIT_PRICE`] are rejected so that sale totals can be
/// summed without overflow.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "precio".to_string(),
        });
    }

    if price.amount() > Decimal::from(MAX_UNIT_PRICE) {
        return Err(ValidationError::OutOfRange {
            field: "precio".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Validators
// =============================================================================

/// A sale must reference at least one product.
pub fn validate_product_ids(ids: &[ProductId]) -> ValidationResult<()> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyProductList);
    }
    Ok(())
}

/// Parses a sale date in `YYYY-MM-DD` form.
///
/// ## Example
/// ```rust
/// use ventas_core::validation::parse_sale_date;
///
/// assert!(parse_sale_date("2023-05-15").is_ok());
/// assert!(parse_sale_date("2023-02-30").is_err());
/// assert!(parse_sale_date("15/05/2023").is_err());
/// ```
pub fn parse_sale_date(text: &str) -> ValidationResult<NaiveDate> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "fechaVenta".to_string(),
        });
    }

    NaiveDate::parse_from_str(text, SALE_DATE_FORMAT)
        .map_err(|e| ValidationError::invalid_format("fechaVenta", e.to_string()))
}

/// Month numbers are 1..=12.
pub fn validate_month(field: &str, month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: 12,
        });
    }
    Ok(())
}

// =============================================================================
// Range Segment Parsers
// =============================================================================

/// Splits a dash-separated segment into exactly `N` unsigned numbers.
fn split_numbers<const N: usize>(field: &str, segment: &str) -> ValidationResult<[u32; N]> {
    let parts: Vec<&str> = segment.split('-').collect();

    if parts.len() != N {
        return Err(ValidationError::invalid_format(
            field,
            format!("expected {N} dash-separated numbers, got '{segment}'"),
        ));
    }

    let mut numbers = [0u32; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                field,
                format!("'{part}' is not a number"),
            ));
        }
        *slot = part.parse().map_err(|_| {
            ValidationError::invalid_format(field, format!("'{part}' is out of range"))
        })?;
    }

    Ok(numbers)
}

fn to_year(field: &str, value: u32) -> ValidationResult<i32> {
    i32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(i32::MAX),
    })
}

fn to_date(field: &str, year: u32, month: u32, day: u32) -> ValidationResult<NaiveDate> {
    let year = to_year(field, year)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ValidationError::invalid_format(
            field,
            format!("{year}-{month}-{day} is not a calendar date"),
        )
    })
}

/// Parses `{startYear}-{endYear}`.
pub fn parse_year_range(segment: &str) -> ValidationResult<YearRange> {
    let [start, end] = split_numbers::<2>("yearRange", segment)?;
    Ok(YearRange::new(
        to_year("startYear", start)?,
        to_year("endYear", end)?,
    ))
}

/// Parses `{year}-{startMonth}-{endYear}-{endMonth}`.
pub fn parse_month_range(segment: &str) -> ValidationResult<MonthRange> {
    let [year, start_month, end_year, end_month] = split_numbers::<4>("monthRange", segment)?;
    MonthRange::new(
        to_year("year", year)?,
        start_month,
        to_year("endYear", end_year)?,
        end_month,
    )
}

/// Parses `{y1}-{m1}-{d1}-{y2}-{m2}-{d2}`.
///
/// Both dates must exist on the calendar: `2023-2-30` is rejected.
pub fn parse_day_range(segment: &str) -> ValidationResult<DayRange> {
    let [y1, m1, d1, y2, m2, d2] = split_numbers::<6>("dayRange", segment)?;
    Ok(DayRange::new(
        to_date("startDate", y1, m1, d1)?,
        to_date("endDate", y2, m2, d2)?,
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Café").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
        assert!(validate_product_name(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::new(dec!(0))).is_ok());
        assert!(validate_price(Money::new(dec!(12.50))).is_ok());
        assert!(matches!(
            validate_price(Money::new(dec!(-1))),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price(Money::new(dec!(1000000000))).is_ok());
        assert!(matches!(
            validate_price(Money::new(dec!(1000000000.01))),
            Err(ValidationError::OutOfRange { max: MAX_UNIT_PRICE, .. })
        ));
        assert!(validate_price(Money::new(Decimal::MAX)).is_err());
    }

    #[test]
    fn test_validate_product_ids() {
        assert!(matches!(
            validate_product_ids(&[]),
            Err(ValidationError::EmptyProductList)
        ));
        assert!(validate_product_ids(&[1, 1]).is_ok());
    }

    #[test]
    fn test_parse_sale_date() {
        let date = parse_sale_date("2023-05-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 5, 15).unwrap());

        assert!(matches!(
            parse_sale_date(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_sale_date("2023-02-30"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_sale_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_year_range() {
        let range = parse_year_range("2023-2024").unwrap();
        assert_eq!(range, YearRange::new(2023, 2024));

        // inverted ranges parse fine, they just match nothing
        assert!(parse_year_range("2024-2023").is_ok());

        assert!(parse_year_range("2023").is_err());
        assert!(parse_year_range("2023-2024-2025").is_err());
        assert!(parse_year_range("abcd-2024").is_err());
        assert!(parse_year_range("2023--2024").is_err());
        assert!(parse_year_range("+2023-2024").is_err());
    }

    #[test]
    fn test_parse_month_range() {
        let range = parse_month_range("2023-3-2023-5").unwrap();
        assert_eq!(range.start(), (2023, 3));
        assert_eq!(range.end(), (2023, 5));

        assert!(matches!(
            parse_month_range("2023-0-2023-5"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(parse_month_range("2023-3-2023-13").is_err());
        assert!(parse_month_range("2023-3-2023").is_err());
    }

    #[test]
    fn test_parse_day_range() {
        let range = parse_day_range("2023-3-10-2023-5-15").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 3, 10).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 5, 15).unwrap());

        // zero padding is accepted
        assert!(parse_day_range("2023-03-01-2023-03-31").is_ok());

        assert!(parse_day_range("2023-2-30-2023-3-1").is_err());
        assert!(parse_day_range("2023-13-1-2023-12-1").is_err());
        assert!(parse_day_range("2023-3-10-2023-5").is_err());
    }
}
