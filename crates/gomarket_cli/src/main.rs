//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gomarket_core` linkage.
//! - Dump a persisted cart: `gomarket_cli [db_path]`.

use gomarket_core::db::open_db;
use gomarket_core::{CartStore, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("gomarket_core ping={}", gomarket_core::ping());
    println!("gomarket_core version={}", gomarket_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match dump_cart(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cart dump failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dump_cart(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let mut cart = CartStore::new(SqliteKeyValueStore::new(&conn));
    cart.initialize()?;

    println!("cart key={} items={}", cart.key(), cart.items().len());
    for item in cart.items() {
        println!(
            "{}\t{}\tx{}\t{:.2}\t{}",
            item.id, item.title, item.quantity, item.price, item.image_url
        );
    }
    Ok(())
}
