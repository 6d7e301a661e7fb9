//! Output destinations and the file write hook

use super::{error::Result, log_entry::LogEntry};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub trait Appender: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Writes one formatted entry to a log file
///
/// Installing a writer in the config replaces the default append; it runs
/// on the file worker thread.
pub trait FileWriter: Send + Sync {
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Appends to the file, creating it when missing
#[derive(Debug, Default, Clone, Copy)]
pub struct AppendFileWriter;

impl FileWriter for AppendFileWriter {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())
    }
}

impl<F> FileWriter for F
where
    F: Fn(&Path, &str) -> io::Result<()> + Send + Sync,
{
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_file_writer_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.txt");

        AppendFileWriter.write(&path, "one\n").unwrap();
        AppendFileWriter.write(&path, "two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_closure_writer() {
        let writer = |_: &Path, content: &str| -> io::Result<()> {
            assert_eq!(content, "x");
            Ok(())
        };
        assert!(FileWriter::write(&writer, Path::new("unused"), "x").is_ok());
    }
}
