//! File logging example
//!
//! Demonstrates daily log files with a header block, retention, and the
//! file-only entry point.
//!
//! Run with: cargo run --example file_logging

use rust_log_utils::prelude::*;
use std::io;

fn main() -> Result<()> {
    println!("=== Rust Log Utils - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("rust_log_utils_demo");
    let logger = Logger::builder()
        .file_switch(true)
        .dir(&dir)
        .file_prefix("demo")
        .save_days(7)
        .file_extra_head("Build", env!("CARGO_PKG_VERSION"))
        .on_file_output(|path, content| {
            if content.starts_with("*") {
                println!("   [header written to {}]", path.display());
            }
        })
        .build()?;

    println!("1. Logging to both console and file:");
    logger.i(&[&"Application started"]);
    logger.d(&[&"Loading configuration..."]);
    logger.w(&[&"Using default settings for some options"]);

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        logger.i(&[&format!("Processing item {}/5", i)]);
        if i == 3 {
            logger.w(&[&"Item 3 took longer than expected"]);
        }
    }

    println!("\n3. Recording an error chain:");
    let error = io::Error::new(io::ErrorKind::PermissionDenied, "cannot open cache");
    logger.e_tag("Cache", &[&Throwable::from_error(&error)]);

    println!("\n4. Writing to the file only:");
    logger.file(&"Audit: configuration reloaded");

    logger.flush()?;

    println!("\n5. Files in {}:", dir.display());
    for path in logger.log_files()? {
        println!("   {}", path.display());
    }
    println!("   Entries written: {}", logger.metrics().total_logged());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
