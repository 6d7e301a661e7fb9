//! Header block written once at the top of every new log file

use std::fmt;

const KEY_WIDTH: usize = 19;

/// Ordered key/value header
///
/// Entries live in two partitions: `first` entries (such as the creation
/// date) print before the host information, `extra` entries after it.
/// Re-adding a key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    name: String,
    first: Vec<(String, String)>,
    extra: Vec<(String, String)>,
}

impl FileHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add or replace an entry printed before the host information
    pub fn add_first(&mut self, key: &str, value: &str) -> &mut Self {
        upsert(&mut self.first, key, value);
        self
    }

    /// Add or replace an entry printed after the host information
    pub fn append(&mut self, key: &str, value: &str) -> &mut Self {
        upsert(&mut self.extra, key, value);
        self
    }

    pub fn append_all<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in entries {
            self.append(key.as_ref(), value.as_ref());
        }
        self
    }

    pub fn extra_entries(&self) -> &[(String, String)] {
        &self.extra
    }

    fn border(&self) -> String {
        format!("************* {} Head ****************", self.name)
    }
}

fn pad_key(key: &str) -> String {
    format!("{:<width$}", key, width = KEY_WIDTH)
}

fn upsert(entries: &mut Vec<(String, String)>, key: &str, value: &str) {
    if key.is_empty() || value.is_empty() {
        return;
    }
    let key = pad_key(key);
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => entries.push((key, value.to_string())),
    }
}

fn host_info() -> Vec<(String, String)> {
    vec![
        (pad_key("Operating System"), std::env::consts::OS.to_string()),
        (pad_key("Architecture"), std::env::consts::ARCH.to_string()),
        (pad_key("Process ID"), std::process::id().to_string()),
        (pad_key("Crate Version"), env!("CARGO_PKG_VERSION").to_string()),
    ]
}

fn join_entries(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = self.border();
        writeln!(f, "{}", border)?;
        writeln!(f, "{}", join_entries(&self.first))?;
        writeln!(f, "{}", join_entries(&host_info()))?;
        for (key, value) in &self.extra {
            writeln!(f, "{}: {}", key, value)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_padded() {
        let mut header = FileHeader::new("Log");
        header.append("Version", "1.2.0");
        assert_eq!(header.extra_entries()[0].0, "Version            ");
        assert_eq!(header.extra_entries()[0].0.len(), 19);

        header.append("a key that is longer than nineteen", "v");
        assert_eq!(header.extra_entries()[1].0, "a key that is longer than nineteen");
    }

    #[test]
    fn test_empty_key_or_value_ignored() {
        let mut header = FileHeader::new("Log");
        header.append("", "value").append("key", "");
        assert!(header.extra_entries().is_empty());
    }

    #[test]
    fn test_readding_key_replaces_in_place() {
        let mut header = FileHeader::new("Log");
        header
            .append("Build", "debug")
            .append("Flavor", "free")
            .append("Build", "release");
        let keys: Vec<&str> = header.extra_entries().iter().map(|(k, _)| k.trim_end()).collect();
        assert_eq!(keys, vec!["Build", "Flavor"]);
        assert_eq!(header.extra_entries()[0].1, "release");
    }

    #[test]
    fn test_layout() {
        let mut header = FileHeader::new("Log");
        header.add_first("Date of Creation", "2024_01_06");
        header.append("User", "alice");

        let rendered = header.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "************* Log Head ****************");
        assert_eq!(lines[1], "Date of Creation   : 2024_01_06");
        assert!(lines[2].starts_with("Operating System   : "));
        assert_eq!(lines[lines.len() - 3], "User               : alice");
        assert_eq!(lines[lines.len() - 2], "");
        assert_eq!(lines[lines.len() - 1], "************* Log Head ****************");
        assert!(rendered.ends_with("****************\n"));
    }
}
