//! # Seed Data Generator
//!
//! Populates a database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p bookvault-db --bin seed
//! cargo run -p bookvault-db --bin seed -- --copies 3 --db ./data/bookvault.db
//! RUST_LOG=bookvault_db=debug cargo run -p bookvault-db --bin seed
//! ```
//!
//! Each catalog entry is inserted `--copies` times as separate editions
//! ("Dune", "Dune (2nd edition)", ...) with a price step per edition.

use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bookvault_core::NewBook;
use bookvault_db::{Database, DbConfig};

/// (title, author, base price in cents)
const CATALOG: &[(&str, &str, i64)] = &[
    ("Dune", "Frank Herbert", 1099),
    ("Children of Dune", "Frank Herbert", 1199),
    ("Emma", "Jane Austen", 799),
    ("Persuasion", "Jane Austen", 699),
    ("The Left Hand of Darkness", "Ursula K. Le Guin", 1299),
    ("A Wizard of Earthsea", "Ursula K. Le Guin", 999),
    ("Beloved", "Toni Morrison", 1499),
    ("Invisible Cities", "Italo Calvino", 1150),
    ("The Remains of the Day", "Kazuo Ishiguro", 1350),
    ("Middlemarch", "George Eliot", 899),
];

/// Added per edition beyond the first.
const EDITION_PRICE_STEP: i64 = 250;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut copies: usize = 1;
    let mut db_path = String::from("./bookvault.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--copies" | "-c" => {
                if i + 1 < args.len() {
                    copies = args[i + 1].parse().unwrap_or(1);
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
                println!("BookVault Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --copies <N>   Editions per catalog entry (default: 1)");
                println!("  -d, --db <PATH>    Database file path (default: ./bookvault.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    info!(path = %db_path, "Connected, migrations applied");

    let existing = db.books().count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated; delete the database file to regenerate");
        return Ok(());
    }

    let mut inserted = 0usize;
    for edition in 0..copies {
        for (title, author, base_price) in CATALOG {
            let book = edition_of(title, author, *base_price, edition);
            match db.books().insert(&book).await {
                Ok(_) => inserted += 1,
                Err(e) => warn!(title = %book.title, error = %e, "Failed to insert book"),
            }
        }
    }

    info!(inserted, "Seed complete");
    db.close().await;
    Ok(())
}

fn edition_of(title: &str, author: &str, base_price: i64, edition: usize) -> NewBook {
    let title = match edition {
        0 => title.to_string(),
        n => format!("{title} ({} edition)", ordinal(n + 1)),
    };

    NewBook {
        description: format!("{title}, by {author}."),
        title,
        author: author.to_string(),
        price_cents: base_price + EDITION_PRICE_STEP * edition as i64,
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
