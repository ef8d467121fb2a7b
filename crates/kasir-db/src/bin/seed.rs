//! # Seed Data Generator
//!
//! Populates the database with sample categories and products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db (or $DB_CONN when set)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Seeding is skipped when the database already has products.

use anyhow::Context;
use kasir_core::validation::{validate_category_input, validate_product_input};
use kasir_core::{CategoryInput, ProductInput};
use kasir_db::{Database, DbConfig};
use std::env;
use tracing_subscriber::EnvFilter;

/// Sample catalog: (category, description, [(product, price, stock)]).
const CATALOG: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Minuman",
        "Minuman dingin dan panas",
        &[
            ("Aqua 600ml", 3500, 48),
            ("Teh Botol Sosro", 4500, 36),
            ("Kopi Susu Gula Aren", 18000, 20),
            ("Coca-Cola 390ml", 6000, 24),
            ("Pocari Sweat 500ml", 7500, 24),
        ],
    ),
    (
        "Makanan",
        "Makanan ringan dan instan",
        &[
            ("Indomie Goreng", 3500, 80),
            ("Indomie Soto", 3300, 60),
            ("Roti Tawar", 16000, 10),
            ("Chitato 68g", 11000, 30),
            ("Oreo 133g", 9500, 25),
        ],
    ),
    (
        "Kebutuhan Rumah",
        "Sabun, deterjen, dan lainnya",
        &[
            ("Sabun Lifebuoy", 4500, 40),
            ("Rinso 770g", 24000, 12),
            ("Pasta Gigi Pepsodent", 12500, 18),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = env::var("DB_CONN").unwrap_or_else(|_| String::from("./kasir.db"));

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
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DB_CONN or ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open database at {}", db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let mut generated = 0;

    for (category_name, description, products) in CATALOG {
        let category_input = CategoryInput {
            name: category_name.to_string(),
            description: Some(description.to_string()),
        };
        validate_category_input(&category_input)?;

        let category = db
            .categories()
            .create(&category_input)
            .await
            .with_context(|| format!("failed to insert category {}", category_name))?;

        for (name, price, stock) in products.iter() {
            let input = ProductInput {
                name: name.to_string(),
                price: *price,
                stock: *stock,
                category_id: Some(category.id),
            };
            validate_product_input(&input)?;

            if let Err(e) = db.products().create(&input).await {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }

            generated += 1;
        }

        println!("  {}: {} products", category.name, products.len());
    }

    println!();
    println!("✓ Generated {} products in {} categories", generated, CATALOG.len());

    let kopi = db.products().list(Some("kopi")).await?;
    println!("  Filter 'kopi': {} results", kopi.len());

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
