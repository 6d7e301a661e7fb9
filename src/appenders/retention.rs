//! Retention policy for dated log files
//!
//! Files are recognised by name: `{prefix}_{yyyy_MM_dd}_{anything}`. When a
//! new file is created, every sibling whose embedded date is at or before
//! `new date at midnight - save_days` is expired.

use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::{parse_file_date, MILLIS_PER_DAY};
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}_[0-9]{2}_[0-9]{2}").expect("valid date regex"));

/// First `yyyy_MM_dd` segment of a file name
pub fn find_date(file_name: &str) -> Option<&str> {
    DATE_REGEX.find(file_name).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    days: i64,
    matcher: Regex,
}

impl RetentionPolicy {
    pub fn new(prefix: &str, days: i64) -> Result<Self> {
        let pattern = format!(r"^{}_\d{{4}}_\d{{2}}_\d{{2}}_.*$", regex::escape(prefix));
        let matcher = Regex::new(&pattern)
            .map_err(|e| LoggerError::config("RetentionPolicy", e.to_string()))?;
        Ok(Self { days, matcher })
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn is_enabled(&self) -> bool {
        self.days > 0
    }

    pub fn is_log_file_name(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }

    /// Latest instant that is still expired for a file created on `new_file_date`
    pub fn cutoff(&self, new_file_date: &str) -> Option<NaiveDateTime> {
        let midnight = parse_file_date(new_file_date)?;
        midnight.checked_sub_signed(Duration::milliseconds(self.days.checked_mul(MILLIS_PER_DAY)?))
    }

    /// Whether a file name's embedded date is at or before `cutoff`
    ///
    /// An unreadable date counts as the earliest possible instant.
    pub fn is_expired(&self, file_name: &str, cutoff: NaiveDateTime) -> bool {
        let date = find_date(file_name)
            .and_then(parse_file_date)
            .unwrap_or(NaiveDateTime::MIN);
        date <= cutoff
    }

    /// Log files in `dir`, sorted by name; empty when `dir` does not exist
    pub fn log_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(dir)
            .map_err(|e| LoggerError::retention(dir.display().to_string(), e.to_string()))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| self.is_log_file_name(name))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Files in `dir` that expire when a file dated `new_file_date` is created
    pub fn expired_files(&self, dir: &Path, new_file_date: &str) -> Result<Vec<PathBuf>> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }
        let Some(cutoff) = self.cutoff(new_file_date) else {
            return Err(LoggerError::retention(
                dir.display().to_string(),
                format!("invalid file date '{}'", new_file_date),
            ));
        };

        Ok(self
            .log_files(dir)?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| self.is_expired(name, cutoff))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_matcher() {
        let policy = RetentionPolicy::new("app", 3).unwrap();
        assert!(policy.is_log_file_name("app_2024_01_01_proc.txt"));
        assert!(!policy.is_log_file_name("app_2024_1_01_proc.txt"));
        assert!(!policy.is_log_file_name("other_2024_01_01_proc.txt"));
        assert!(!policy.is_log_file_name("xapp_2024_01_01_proc.txt"));
    }

    #[test]
    fn test_prefix_is_escaped() {
        let policy = RetentionPolicy::new("a.b", 1).unwrap();
        assert!(policy.is_log_file_name("a.b_2024_01_01_p.txt"));
        assert!(!policy.is_log_file_name("axb_2024_01_01_p.txt"));
    }

    #[test]
    fn test_find_date() {
        assert_eq!(find_date("app_2024_01_05_proc.txt"), Some("2024_01_05"));
        assert_eq!(find_date("nothing here"), None);
    }

    #[test]
    fn test_cutoff() {
        let policy = RetentionPolicy::new("app", 3).unwrap();
        let cutoff = policy.cutoff("2024_01_06").unwrap();
        assert_eq!(cutoff.to_string(), "2024-01-03 00:00:00");
        assert!(policy.cutoff("garbage").is_none());
    }

    #[test]
    fn test_expired_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app_2024_01_01_proc.txt");
        touch(dir.path(), "app_2024_01_03_proc.txt");
        touch(dir.path(), "app_2024_01_05_proc.txt");
        touch(dir.path(), "other_2024_01_01_proc.txt");

        let policy = RetentionPolicy::new("app", 3).unwrap();
        let expired = policy.expired_files(dir.path(), "2024_01_06").unwrap();
        assert_eq!(
            names(&expired),
            vec!["app_2024_01_01_proc.txt", "app_2024_01_03_proc.txt"]
        );
    }

    #[test]
    fn test_unparseable_date_is_expired() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app_2024_13_45_proc.txt");

        let policy = RetentionPolicy::new("app", 3).unwrap();
        let expired = policy.expired_files(dir.path(), "2024_01_06").unwrap();
        assert_eq!(names(&expired), vec!["app_2024_13_45_proc.txt"]);
    }

    #[test]
    fn test_disabled_retention() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app_2000_01_01_proc.txt");

        for days in [0, -1] {
            let policy = RetentionPolicy::new("app", days).unwrap();
            assert!(policy.expired_files(dir.path(), "2024_01_06").unwrap().is_empty());
        }
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let policy = RetentionPolicy::new("app", 3).unwrap();
        assert!(policy
            .log_files(Path::new("/definitely/not/a/dir"))
            .unwrap()
            .is_empty());
    }
}
