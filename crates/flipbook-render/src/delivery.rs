//! Where exported files end up.

use flipbook_core::EncoderError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Delivery errors.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Delivery error: {0}")]
    Other(String),
}

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

impl From<DeliveryError> for EncoderError {
    fn from(err: DeliveryError) -> Self {
        EncoderError::Delivery(err.to_string())
    }
}

/// Destination for encoded export files.
///
/// Sinks are shared with the encoder thread, hence `Send + Sync`.
pub trait FileSink: Send + Sync {
    /// Store `bytes` under `filename`, replacing any previous file.
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DeliveryResult<()>;
}

/// Writes exports into a directory on disk.
pub struct DirectorySink {
    base_path: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> DeliveryResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                DeliveryError::Io(format!("Failed to create export directory {}: {}", base_path.display(), e))
            })?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full path for `filename`, with anything unsafe for a file name replaced.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let safe: String = filename
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        self.base_path.join(safe)
    }
}

impl FileSink for DirectorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DeliveryResult<()> {
        let path = self.path_for(filename);
        fs::write(&path, bytes).map_err(|e| DeliveryError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps exported files in memory, for tests and previews.
#[derive(Default)]
pub struct MemorySink {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a delivered file.
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(filename).cloned()
    }

    /// Names of all delivered files, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.files.lock() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSink for MemorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DeliveryResult<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| DeliveryError::Other(format!("Lock error: {}", e)))?;
        files.insert(filename.to_string(), bytes.to_vec());
        Ok(())
    }
}
