//! Date-rotated file appender
//!
//! Every entry goes to `{dir}/{prefix}_{yyyy_MM_dd}_{process}{ext}` for the
//! entry's own date, so a new file starts with the first entry of each day.
//! A new file gets the header block first and triggers retention cleanup of
//! expired siblings. All file work, writes and deletions alike, runs on one
//! worker thread fed by a FIFO queue, so callers never wait on disk I/O.

use super::retention::RetentionPolicy;
use crate::core::appender::{AppendFileWriter, Appender, FileWriter};
use crate::core::config::{FileObserver, SharedConfig};
use crate::core::error::{LoggerError, Result};
use crate::core::file_header::FileHeader;
use crate::core::line_wrapper::LINE_SEP;
use crate::core::log_entry::LogEntry;
use crate::core::log_level::LogLevel;
use crate::core::logger::DEFAULT_SHUTDOWN_TIMEOUT;
use crate::core::metrics::LoggerMetrics;
use crate::core::timestamp::{entry_time, file_date};
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Header key of the creation date entry
const CREATION_DATE_KEY: &str = "Date of Log";

enum FileTask {
    Write {
        level: LogLevel,
        tag: String,
        content: String,
        timestamp: DateTime<Local>,
    },
    Delete(PathBuf),
    Barrier(Sender<()>),
    Shutdown,
}

pub struct RotatingFileAppender {
    config: SharedConfig,
    sender: Sender<FileTask>,
    handle: Option<JoinHandle<()>>,
    metrics: Arc<LoggerMetrics>,
}

impl RotatingFileAppender {
    /// Start the file worker
    pub fn new(config: SharedConfig, metrics: Arc<LoggerMetrics>) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let worker = FileWorker {
            config: Arc::clone(&config),
            metrics: Arc::clone(&metrics),
            sender: sender.clone(),
            pending_deletions: 0,
        };

        let handle = thread::Builder::new()
            .name("log-file-worker".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|e| LoggerError::io_operation("starting file worker", "cannot spawn thread", e))?;

        Ok(Self {
            config,
            sender,
            handle: Some(handle),
            metrics,
        })
    }

    /// Queue one entry; `content` is everything after `{level}/{tag}`
    pub fn write(
        &self,
        level: LogLevel,
        tag: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Result<()> {
        self.sender
            .send(FileTask::Write {
                level,
                tag: tag.into(),
                content: content.into(),
                timestamp,
            })
            .map_err(|_| LoggerError::ChannelSendError)
    }

    /// Path entries logged now are written to
    pub fn current_path(&self) -> PathBuf {
        let config = self.config.read();
        config.settings.log_file_path(&config.clock.now())
    }

    /// Existing log files for the configured prefix, sorted by name
    pub fn log_files(&self) -> Result<Vec<PathBuf>> {
        let (dir, policy) = {
            let config = self.config.read();
            let settings = &config.settings;
            (
                settings.dir().to_path_buf(),
                RetentionPolicy::new(settings.file_prefix(), settings.save_days)?,
            )
        };
        policy.log_files(&dir)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Block until every task queued before this call, including the
    /// deletions it triggers, has run
    pub fn sync(&self) -> Result<()> {
        let (done_tx, done_rx) = bounded(1);
        self.sender
            .send(FileTask::Barrier(done_tx))
            .map_err(|_| LoggerError::ChannelSendError)?;
        done_rx.recv().map_err(|_| LoggerError::WorkerStopped)
    }

    /// Stop the worker after it drains the queue
    ///
    /// Returns `false` if the worker did not finish within `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };
        if self.sender.send(FileTask::Shutdown).is_err() {
            return false;
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] File worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] File worker did not finish within {:?} timeout. \
                     Some logs may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Appender for RotatingFileAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.write(entry.level, entry.tag.as_str(), entry.file_content(), entry.timestamp)
    }

    fn flush(&self) -> Result<()> {
        self.sync()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

/// Snapshot of the config taken for one write
struct WriteJob {
    path: PathBuf,
    date: String,
    prefix: String,
    save_days: i64,
    header: FileHeader,
    writer: Option<Arc<dyn FileWriter>>,
    observer: Option<FileObserver>,
}

struct FileWorker {
    config: SharedConfig,
    metrics: Arc<LoggerMetrics>,
    /// Used to queue retention deletions behind the current write
    sender: Sender<FileTask>,
    pending_deletions: usize,
}

impl FileWorker {
    fn run(mut self, receiver: Receiver<FileTask>) {
        while let Ok(task) = receiver.recv() {
            match task {
                FileTask::Shutdown => {
                    while let Ok(task) = receiver.try_recv() {
                        match task {
                            FileTask::Barrier(done) => {
                                let _ = done.send(());
                            }
                            FileTask::Shutdown => {}
                            task => self.process_isolated(task),
                        }
                    }
                    break;
                }
                FileTask::Barrier(done) => {
                    if self.pending_deletions > 0 {
                        // Deletions queued by earlier writes are still ahead
                        let _ = self.sender.send(FileTask::Barrier(done));
                    } else {
                        let _ = done.send(());
                    }
                }
                task => self.process_isolated(task),
            }
        }
    }

    /// Run one task, keeping the worker alive if it panics
    fn process_isolated(&mut self, task: FileTask) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.process(task)));
        if let Err(panic_info) = result {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!(
                "[LOGGER CRITICAL] File worker task panicked: {}. The worker continues.",
                panic_msg
            );
            self.metrics.record_dropped();
        }
    }

    fn process(&mut self, task: FileTask) {
        match task {
            FileTask::Write {
                level,
                tag,
                content,
                timestamp,
            } => self.write(level, &tag, &content, &timestamp),
            FileTask::Delete(path) => self.delete(&path),
            FileTask::Barrier(_) | FileTask::Shutdown => {}
        }
    }

    fn snapshot(&self, timestamp: &DateTime<Local>) -> WriteJob {
        let config = self.config.read();
        let settings = &config.settings;
        WriteJob {
            path: settings.log_file_path(timestamp),
            date: file_date(timestamp),
            prefix: settings.file_prefix().to_string(),
            save_days: settings.save_days,
            header: config.file_header.clone(),
            writer: config.file_writer.clone(),
            observer: config.on_file_output.clone(),
        }
    }

    fn write(&mut self, level: LogLevel, tag: &str, content: &str, timestamp: &DateTime<Local>) {
        let job = self.snapshot(timestamp);
        if let Err(e) = self.create_or_exists_file(&job) {
            eprintln!("[LOGGER ERROR] {}", e);
            self.metrics.record_dropped();
            return;
        }

        let line = format!(
            "{} {}/{}{}{}",
            entry_time(timestamp),
            level.as_char(),
            tag,
            content,
            LINE_SEP
        );
        if Self::input_to_file(&job, &line) {
            self.metrics.record_logged();
        } else {
            self.metrics.record_dropped();
        }
    }

    /// Make sure the file for `job` exists; a new file triggers retention
    /// cleanup and gets the header
    fn create_or_exists_file(&mut self, job: &WriteJob) -> Result<()> {
        let path_str = || job.path.display().to_string();
        if job.path.exists() {
            if job.path.is_file() {
                return Ok(());
            }
            return Err(LoggerError::file_appender(path_str(), "path exists and is not a file"));
        }

        let Some(dir) = job.path.parent() else {
            return Err(LoggerError::file_appender(path_str(), "path has no parent directory"));
        };
        fs::create_dir_all(dir)
            .map_err(|e| LoggerError::io_operation("creating log directory", dir.display().to_string(), e))?;

        self.delete_due_logs(dir, job);

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&job.path)
            .map_err(|e| LoggerError::io_operation("creating log file", path_str(), e))?;

        self.metrics.record_file_created();
        let mut header = job.header.clone();
        header.add_first(CREATION_DATE_KEY, &job.date);
        Self::input_to_file(job, &header.to_string());
        Ok(())
    }

    fn delete_due_logs(&mut self, dir: &Path, job: &WriteJob) {
        if job.save_days <= 0 {
            return;
        }
        let expired = RetentionPolicy::new(&job.prefix, job.save_days)
            .and_then(|policy| policy.expired_files(dir, &job.date));

        match expired {
            Ok(files) => {
                for file in files {
                    if self.sender.send(FileTask::Delete(file)).is_ok() {
                        self.pending_deletions += 1;
                    }
                }
            }
            Err(e) => eprintln!("[LOGGER ERROR] {}", e),
        }
    }

    fn delete(&mut self, path: &Path) {
        self.pending_deletions = self.pending_deletions.saturating_sub(1);
        match fs::remove_file(path) {
            Ok(()) => {
                self.metrics.record_file_deleted();
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] {}",
                    LoggerError::retention(path.display().to_string(), e.to_string())
                );
                self.metrics.record_deletion_failure();
            }
        }
    }

    fn input_to_file(job: &WriteJob, content: &str) -> bool {
        let result = match &job.writer {
            Some(writer) => writer.write(&job.path, content),
            None => AppendFileWriter.write(&job.path, content),
        };
        match result {
            Ok(()) => {
                if let Some(observer) = &job.observer {
                    observer(&job.path, content);
                }
                true
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Cannot write to {}: {}", job.path.display(), e);
                false
            }
        }
    }
}
