//! # Seed Data Generator
//!
//! Populates a database with the demo catalog and, optionally, sample sales.
//!
//! ## Usage
//! ```bash
//! # Demo catalog only
//! cargo run -p ventas-db --bin seed
//!
//! # Catalog plus 200 sales spread over 2022-2024
//! cargo run -p ventas-db --bin seed -- --sales 200
//!
//! # Specify database path
//! cargo run -p ventas-db --bin seed -- --db ./data/ventas.db
//! ```
//!
//! Sample sales are deterministic: the same `--sales` count always produces
//! the same dates and product lists.

use chrono::{Days, NaiveDate};
use std::env;
use ventas_core::query;
use ventas_db::demo::{demo_catalog, seed_demo_catalog};
use ventas_db::{Database, DbConfig, Ledger};

/// Sample sales fall within three years starting here.
const FIRST_SALE_DAY: (i32, u32, u32) = (2022, 1, 1);
const SALE_DAY_SPAN: u64 = 3 * 365;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 0;
    let mut db_path = String::from("./ventas_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ventas Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sample sales to create (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./ventas_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Ventas Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let ledger = Ledger::sqlite(&db);

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let added = seed_demo_catalog(&ledger).await?;
    if added == 0 {
        println!("⚠ Catalog already populated, keeping existing products");
    } else {
        println!("✓ Added {} demo products", added);
    }

    if sales > 0 {
        let (y, m, d) = FIRST_SALE_DAY;
        let first_day = NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid first sale day")?;

        println!();
        println!("Generating sales...");
        let start = std::time::Instant::now();

        let created = generate_sales(&ledger, sales, first_day).await?;

        println!();
        if created < sales {
            println!("⚠ {} of {} sales failed", sales - created, sales);
        }
        println!("✓ Generated {} sales in {:?}", created, start.elapsed());
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Creates `count` deterministic sales and returns how many were stored.
async fn generate_sales(
    ledger: &Ledger,
    count: usize,
    first_day: NaiveDate,
) -> Result<usize, Box<dyn std::error::Error>> {
    let product_ids: Vec<i64> = demo_catalog().iter().map(|p| p.id).collect();
    let mut created = 0;

    for seed in 0..count {
        let date = first_day
            .checked_add_days(Days::new((seed as u64 * 37) % SALE_DAY_SPAN))
            .ok_or("sale date out of range")?;
        let ids = sample_products(&product_ids, seed);

        match ledger.create(&ids, date).await {
            Ok(sale) => {
                created += 1;
                if created % 50 == 0 {
                    println!(
                        "  Generated {} sales (last: #{} on {}, total {})",
                        created,
                        sale.id,
                        sale.date,
                        query::total(&sale)
                    );
                }
            }
            Err(e) => eprintln!("Failed to create sale {}: {}", seed, e),
        }
    }

    Ok(created)
}

/// 1-4 products picked from the catalog, repeats allowed.
fn sample_products(product_ids: &[i64], seed: usize) -> Vec<i64> {
    let count = 1 + seed % 4;
    (0..count)
        .map(|k| product_ids[(seed * 7 + k * 3) % product_ids.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventas_db::MemoryStore;

    fn first_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_counts_only_stored_sales() {
        let ledger = Ledger::memory(MemoryStore::new());

        // no catalog yet: every sale references unknown products
        assert_eq!(generate_sales(&ledger, 5, first_day()).await.unwrap(), 0);

        seed_demo_catalog(&ledger).await.unwrap();
        assert_eq!(generate_sales(&ledger, 5, first_day()).await.unwrap(), 5);
        assert_eq!(ledger.list().await.unwrap().len(), 5);
    }

    #[test]
    fn test_sample_products_stays_in_catalog() {
        let ids = [1, 2, 3];
        for seed in 0..20 {
            let picked = sample_products(&ids, seed);
            assert!((1..=4).contains(&picked.len()));
            assert!(picked.iter().all(|id| ids.contains(id)));
        }
    }
}
