//! Basic logger usage example
//!
//! Demonstrates console logging at every level, tags, borders and value rendering.
//!
//! Run with: cargo run --example basic_usage

use rust_log_utils::prelude::*;
use rust_log_utils::{debug, info, log_json, warn};

#[derive(Debug)]
struct Order {
    id: u32,
    total_cents: u64,
}

impl Loggable for Order {}

fn main() -> Result<()> {
    println!("=== Rust Log Utils - Basic Usage Example ===\n");

    let logger = Logger::builder().build()?;

    println!("1. Logging at different levels:");
    verbose_to_assert(&logger);

    println!("\n2. Explicit tags and several values:");
    info!(logger, tag: "Net"; "connected to", "db.local", 5432);

    println!("\n3. Pretty-printed JSON and XML:");
    log_json!(logger, r#"{"user":"alice","roles":["admin","dev"]}"#);
    logger.xml(r#"<config><port>8080</port><debug/></config>"#);

    println!("\n4. Custom formatter for a domain type:");
    logger.register_formatter::<Order, _>(|order| {
        format!("Order #{} ({}.{:02} EUR)", order.id, order.total_cents / 100, order.total_cents % 100)
    });
    debug!(logger, Order { id: 17, total_cents: 4250 });

    println!("\n5. Without borders, with a global tag and a higher floor:");
    logger.configure(|config| {
        config.settings.border_switch = false;
        config.settings.set_global_tag("Demo");
        config.settings.console_filter = LogLevel::Warn;
    });
    info!(logger, "hidden below the floor");
    warn!(logger, "disk usage at 91%");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

fn verbose_to_assert(logger: &Logger) {
    logger.v(&[&"This is a verbose message"]);
    logger.d(&[&"This is a debug message"]);
    logger.i(&[&"This is an info message"]);
    logger.w(&[&"This is a warning message"]);
    logger.e(&[&"This is an error message"]);
    logger.a(&[&"This is an assert message"]);
}
