//! # Seed Data Generator
//!
//! Populates a development database with the coupon set from
//! [`eshop_db::seed`].
//!
//! ## Usage
//! ```bash
//! # Seed ./discount_dev.db
//! cargo run -p eshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p eshop-db --bin seed -- --db ./data/discount.db
//! ```

use std::env;

use eshop_db::seed::{seed_development_data, PRODUCTS};
use eshop_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./discount_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("eShop Discount Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./discount_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 eShop Discount Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = std::time::Instant::now();
    match seed_development_data(&db).await? {
        Some(generated) => {
            println!("✓ Generated {} coupons in {:?}", generated, start.elapsed());
        }
        None => {
            println!("⚠ Database already has {} coupons", db.coupons().count().await?);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Delete the database file to regenerate.");
            return Ok(());
        }
    }

    println!();
    println!("Verifying lookups...");
    for (product, _) in PRODUCTS.iter().take(2) {
        let plain = db.coupons().find_applicable(product, None).await?;
        let welcome = db.coupons().find_applicable(product, Some("WELCOME")).await?;
        println!(
            "  {}: {} automatic, {} with WELCOME",
            product,
            plain.len(),
            welcome.len()
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
