//! Scan error taxonomy

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while planning, reading or classifying a file
///
/// Every variant is fatal for the invocation: the first one raised by any
/// worker cancels the others and is returned to the caller. Nothing is
/// retried.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to stat {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to seek {} to offset {offset}: {source}", path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },

    #[error("failed to read {} at offset {offset}: {source}", path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },

    #[error("invalid byte range: end {end} is before start {start}")]
    InvalidRange { start: u64, end: u64 },

    #[error("range count must be at least 1")]
    InvalidRangeCount,

    /// A null byte was found by the validating scan
    ///
    /// `offset` is the first null in the buffer where it was seen. When a
    /// file holds several null bytes, which one is reported depends on
    /// worker timing and differs between runs.
    #[error("null byte found in file")]
    NullByte { offset: u64 },

    /// The worker stopped because another worker failed first
    #[error("scan cancelled")]
    Cancelled,

    #[error("expected {expected} range results, received {received}")]
    MissingResults { expected: usize, received: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    /// Whether this is an I/O failure (stat, open, seek or read)
    pub fn is_fatal_io(&self) -> bool {
        matches!(
            self,
            ScanError::Stat { .. }
                | ScanError::Open { .. }
                | ScanError::Seek { .. }
                | ScanError::Read { .. }
        )
    }

    /// Whether this is a data-validation failure rather than an I/O one
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, ScanError::NullByte { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_byte_message_has_no_offset() {
        let err = ScanError::NullByte { offset: 4242 };
        assert_eq!(err.to_string(), "null byte found in file");
        assert!(err.is_validation_failure());
        assert!(!err.is_fatal_io());
    }

    #[test]
    fn test_io_classification() {
        let err = ScanError::Open {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_fatal_io());
        assert!(err.to_string().contains("/nope"));
        assert!(!ScanError::Cancelled.is_fatal_io());
    }
}
