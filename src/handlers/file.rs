//! File handler implementation

use crate::core::{Handler, LogRecord, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How an existing file is treated when the handler opens it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Keep existing content and write after it (`a`)
    #[default]
    Append,
    /// Discard existing content (`w`)
    Truncate,
}

impl FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "a" | "append" => Ok(FileMode::Append),
            "w" | "truncate" => Ok(FileMode::Truncate),
            _ => Err(format!("Unsupported file mode: '{}'", s)),
        }
    }
}

/// Writes one line per record to a file.
///
/// The file grows without bound; there is no rotation. Every record is
/// flushed as soon as it is written, under an exclusive advisory lock so
/// handlers sharing a path never interleave partial lines.
pub struct FileHandler {
    path: PathBuf,
    mode: FileMode,
    writer: Option<BufWriter<File>>,
}

impl FileHandler {
    /// Open `path` for appending now
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_mode(path, FileMode::Append)
    }

    pub fn with_mode(path: impl Into<PathBuf>, mode: FileMode) -> Result<Self> {
        let path = path.into();
        let writer = Some(Self::open(&path, mode)?);
        Ok(Self { path, mode, writer })
    }

    /// Defer opening the file until the first record arrives
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pipeline_logger::handlers::{FileHandler, FileMode};
    ///
    /// let handler = FileHandler::delayed("logs/gold_layer.log", FileMode::Append);
    /// assert!(!handler.is_open());
    /// ```
    pub fn delayed(path: impl Into<PathBuf>, mode: FileMode) -> Self {
        Self {
            path: path.into(),
            mode,
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn open(path: &Path, mode: FileMode) -> Result<BufWriter<File>> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Append => options.append(true),
            FileMode::Truncate => options.write(true).truncate(true),
        };

        let file = options
            .open(path)
            .map_err(|e| LoggerError::file_handler(path, e.to_string()))?;
        Ok(BufWriter::new(file))
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            self.writer = Some(Self::open(&self.path, self.mode)?);
        }
        self.writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))
    }
}

#[cfg(feature = "file")]
fn write_locked(writer: &mut BufWriter<File>, bytes: &[u8]) -> std::io::Result<()> {
    use fs2::FileExt;

    FileExt::lock_exclusive(writer.get_ref())?;
    let written = writer.write_all(bytes).and_then(|_| writer.flush());
    let unlocked = FileExt::unlock(writer.get_ref());
    written.and(unlocked)
}

#[cfg(not(feature = "file"))]
fn write_locked(writer: &mut BufWriter<File>, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

impl Handler for FileHandler {
    fn emit(&mut self, _record: &LogRecord, line: &str) -> Result<()> {
        let mut output = String::with_capacity(line.len() + 1);
        output.push_str(line);
        output.push('\n');

        let path = self.path.clone();
        let writer = self.writer()?;
        write_locked(writer, output.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing log file", path.display().to_string(), e))
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn kind(&self) -> &str {
        "file"
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::TempDir;

    fn record(message: &str) -> LogRecord {
        LogRecord::new("data_pipeline_silver", LogLevel::Info, message.to_string())
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("silver_layer.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut handler = FileHandler::new(&path).expect("Failed to create handler");
        handler.emit(&record("later"), "later").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_truncate_discards_existing_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("silver_layer.log");
        fs::write(&path, "stale\n").unwrap();

        let mut handler = FileHandler::with_mode(&path, FileMode::Truncate).unwrap();
        handler.emit(&record("fresh"), "fresh").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_delayed_open_creates_file_on_first_write() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("gold_layer.log");

        let mut handler = FileHandler::delayed(&path, FileMode::Append);
        assert!(!handler.is_open());
        assert!(!path.exists());

        handler.emit(&record("first"), "first").unwrap();
        assert!(handler.is_open());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_missing_directory_is_resource_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("no_such_dir").join("errors.log");

        let err = FileHandler::new(&path).err().expect("open should fail");
        assert!(err.is_resource_error());
        assert!(err.to_string().contains("errors.log"));
    }

    #[test]
    fn test_delayed_missing_directory_fails_on_write() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("no_such_dir").join("errors.log");

        let mut handler = FileHandler::delayed(&path, FileMode::Append);
        assert!(handler.emit(&record("lost"), "lost").is_err());
    }

    #[test]
    fn test_file_mode_parsing() {
        assert_eq!("a".parse::<FileMode>(), Ok(FileMode::Append));
        assert_eq!("w".parse::<FileMode>(), Ok(FileMode::Truncate));
        assert!("r+".parse::<FileMode>().is_err());
    }
}
