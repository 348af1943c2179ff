//! # Seed Data Generator
//!
//! Populates the database with demo categories and items for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./tally.db
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! Enough categories are generated to fill more than one listing page, and
//! the first category gets enough items to paginate too. Some items are
//! fully stocked so both row styles show up.

use std::env;
use tally_db::{Database, DbConfig};

/// Demo inventory: category name → (item name, need, have).
const INVENTORY: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Kitchen",
        &[
            ("Forks", 10, 4),
            ("Plates", 6, 6),
            ("Mugs", 8, 3),
            ("Skillet", 1, 1),
            ("Dish towels", 5, 2),
            ("Cutting board", 2, 0),
            ("Colander", 1, 1),
        ],
    ),
    ("Garage", &[("Rake", 1, 0), ("Extension cord", 2, 2)]),
    ("Bathroom", &[("Towels", 4, 4), ("Shower curtain", 1, 0)]),
    ("Office", &[("Printer paper", 3, 1)]),
    ("Camping", &[("Tent stakes", 12, 12), ("Lantern", 2, 1)]),
    ("Pantry", &[]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tally.db");

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
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tally.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let mut storage = db.acquire().await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = storage.categories().names().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} categories", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut items = 0;
    for (category, contents) in INVENTORY {
        let category_id = storage.categories().create(category).await?;

        for (name, num_need, num_have) in contents.iter() {
            if let Err(e) = storage
                .items()
                .create(category_id, name, *num_need, *num_have)
                .await
            {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }
            items += 1;
        }
    }

    println!();
    println!("✓ Created {} categories and {} items", INVENTORY.len(), items);

    drop(storage);
    db.close().await;

    println!("✓ Seed complete!");
    Ok(())
}
