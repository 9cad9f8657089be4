//! Range scan worker
//!
//! A [`ScanWorker`] scans exactly one [`ByteRange`]. It opens its own file
//! handle, seeks to the range start and reads the span through a bounded
//! buffer, handing every filled buffer to the scan's [`Classifier`].
//!
//! # Lifecycle
//!
//! 1. **Creation**: `ScanWorker::new()` binds a range, the classifier and the
//!    scan-wide cancellation flag
//! 2. **Execution**: `run()` performs the open/seek/read loop
//! 3. **Completion**: returns the range's partial result and the number of
//!    bytes actually read
//!
//! Workers share no file handles. Ranges are disjoint, so no locking is
//! needed between them.

use super::classify::Classifier;
use super::error::ScanError;
use crate::chunk::ByteRange;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{trace, warn};

/// Default read buffer size (1 MiB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Per-worker IO settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
    /// Upper bound on the read buffer; the buffer never exceeds the range span
    pub buffer_size: usize,
    /// Issue a sequential-access hint for the range before reading
    pub fadvise: bool,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            fadvise: true,
        }
    }
}

/// What a worker produced for its range
#[derive(Debug)]
pub struct RangeOutput<P> {
    pub partial: P,
    pub bytes_read: u64,
}

/// Scans one byte range
pub struct ScanWorker<'a, C: Classifier> {
    /// Worker ID, the range's position in dispatch order
    id: usize,
    range: ByteRange,
    classifier: &'a C,
    options: WorkerOptions,
    /// Raised by the engine once any worker has failed
    cancel: &'a AtomicBool,
}

impl<'a, C: Classifier> ScanWorker<'a, C> {
    pub fn new(
        id: usize,
        range: ByteRange,
        classifier: &'a C,
        options: WorkerOptions,
        cancel: &'a AtomicBool,
    ) -> Self {
        Self {
            id,
            range,
            classifier,
            options,
            cancel,
        }
    }

    /// Read and classify the whole range
    ///
    /// Stops early, without error, if the file ends before `range.end`; the
    /// returned `bytes_read` is then shorter than the span.
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidRange`] if `range.end < range.start`
    /// - [`ScanError::Open`], [`ScanError::Seek`], [`ScanError::Read`] on IO failure
    /// - [`ScanError::Cancelled`] if another worker failed first
    /// - whatever the classifier returns
    pub fn run(self) -> Result<RangeOutput<C::Partial>, ScanError> {
        let ByteRange { path, start, end } = &self.range;
        let (start, end) = (*start, *end);

        if end < start {
            return Err(ScanError::InvalidRange { start, end });
        }
        let span = end - start;

        let mut file = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        if self.options.fadvise && span > 0 {
            advise_sequential(&file, start, span);
        }

        file.seek(SeekFrom::Start(start))
            .map_err(|source| ScanError::Seek {
                path: path.to_path_buf(),
                offset: start,
                source,
            })?;

        let buffer_len = (self.options.buffer_size.max(1) as u64).min(span) as usize;
        let mut buffer = vec![0u8; buffer_len];
        let mut partial = C::Partial::default();
        let mut bytes_read: u64 = 0;

        while bytes_read < span {
            if self.cancel.load(Ordering::Acquire) {
                trace!(worker = self.id, start, "cancelled");
                return Err(ScanError::Cancelled);
            }

            let want = (span - bytes_read).min(buffer_len as u64) as usize;
            let n = match file.read(&mut buffer[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ScanError::Read {
                        path: path.to_path_buf(),
                        offset: start + bytes_read,
                        source,
                    })
                }
            };

            self.classifier
                .classify(&mut partial, &buffer[..n], start + bytes_read)?;
            bytes_read += n as u64;
        }

        if bytes_read < span {
            warn!(
                worker = self.id,
                start,
                end,
                bytes_read,
                "file ended before range end"
            );
        }

        trace!(worker = self.id, start, end, bytes_read, "range complete");

        Ok(RangeOutput {
            partial,
            bytes_read,
        })
    }
}

/// Hint the kernel that `[offset, offset + len)` will be read sequentially
///
/// The hint is advisory; failure is logged and otherwise ignored.
#[cfg(target_os = "linux")]
fn advise_sequential(file: &File, offset: u64, len: u64) {
    use std::os::unix::io::AsRawFd;

    let result = unsafe {
        libc::posix_fadvise(
            file.as_raw_fd(),
            offset as libc::off_t,
            len as libc::off_t,
            libc::POSIX_FADV_SEQUENTIAL,
        )
    };
    if result != 0 {
        let err = std::io::Error::from_raw_os_error(result);
        warn!(offset, len, error = %err, "posix_fadvise(SEQUENTIAL) failed");
    }
}

#[cfg(not(target_os = "linux"))]
fn advise_sequential(_file: &File, _offset: u64, _len: u64) {}
