//! Stress tests for concurrent file logging
//!
//! These tests verify:
//! - No entry is lost or torn when many threads log to one file
//! - Entries from one thread keep their order
//! - Rotation and retention stay consistent under load

use rust_log_utils::core::{FixedClock, FixedStackProvider, StackFrame};
use rust_log_utils::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn file_logger(dir: &TempDir, clock: FixedClock) -> Logger {
    Logger::builder()
        .console_switch(false)
        .file_switch(true)
        .head_switch(false)
        .dir(dir.path())
        .file_prefix("stress")
        .process_name("test")
        .save_days(2)
        .clock(clock)
        .stack_provider(FixedStackProvider::single(StackFrame::new("stress", "run", None, 1)))
        .build()
        .expect("Failed to build logger")
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(file_logger(&temp_dir, FixedClock::at_local(2024, 5, 1, 10, 0, 0)));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let tag = format!("T{}", t);
                for i in 0..PER_THREAD {
                    logger.i_tag(&tag, &[&format!("msg {}", i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }
    logger.flush().expect("Failed to flush");

    assert_eq!(logger.metrics().total_logged(), (THREADS * PER_THREAD) as u64);
    assert_eq!(logger.metrics().dropped_count(), 0);
    assert_eq!(logger.metrics().files_created(), 1);

    let content = fs::read_to_string(logger.current_log_file_path()).unwrap();
    let mut last_seen: HashMap<String, usize> = HashMap::new();
    let mut entries = 0;
    for line in content.lines().filter(|line| line.contains(" I/T")) {
        let (_, rest) = line.split_once(" I/").expect("entry line");
        let (tag, message) = rest.split_once(": msg ").expect("entry body");
        let index: usize = message.parse().expect("whole message index");

        if let Some(previous) = last_seen.insert(tag.to_string(), index) {
            assert_eq!(index, previous + 1, "entries of {} out of order", tag);
        } else {
            assert_eq!(index, 0);
        }
        entries += 1;
    }
    assert_eq!(entries, THREADS * PER_THREAD);
}

#[test]
fn test_rotation_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let clock = FixedClock::at_local(2024, 5, 1, 23, 0, 0);
    let logger = Arc::new(file_logger(&temp_dir, clock.clone()));

    for day in 0..5 {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..50 {
                        logger.w(&[&format!("day {} thread {} msg {}", day, t, i)]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Logging thread panicked");
        }
        logger.flush().expect("Failed to flush");
        clock.advance(chrono::Duration::days(1));
    }

    let names: Vec<String> = logger
        .log_files()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["stress_2024_05_04_test.txt", "stress_2024_05_05_test.txt"]
    );
    assert_eq!(logger.metrics().files_created(), 5);
    assert_eq!(logger.metrics().files_deleted(), 3);
    assert_eq!(logger.metrics().total_logged(), 5 * 4 * 50);
}
