//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gomarket_core` linkage without the Flutter runtime.
//! - Print the cart stored in a database file for quick local inspection.
//!
//! Usage: `gomarket_cli [DB_PATH]` (defaults to `GOMARKET_DB_PATH`, then a
//! file in the OS temp directory).

use std::path::PathBuf;
use std::process::ExitCode;

const CART_DB_FILE_NAME: &str = "gomarket_cart.sqlite3";

fn main() -> ExitCode {
    println!("gomarket_core ping={}", gomarket_core::ping());
    println!("gomarket_core version={}", gomarket_core::core_version());

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("GOMARKET_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(|| std::env::temp_dir().join(CART_DB_FILE_NAME));

    let (store, outcome) = match gomarket_core::open_cart(&path) {
        Ok(opened) => opened,
        Err(err) => {
            eprintln!("failed to open cart at {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    println!("cart path={} load={outcome:?}", path.display());
    for entry in store.entries() {
        println!(
            "  {} x{} @ {:.2} ({})",
            entry.id, entry.quantity, entry.price, entry.title
        );
    }
    let summary = store.summary();
    println!(
        "items={} quantity={} subtotal={:.2}",
        summary.distinct_items, summary.total_quantity, summary.subtotal
    );
    ExitCode::SUCCESS
}
