//! Byte classifiers
//!
//! A [`Classifier`] decides what a worker does with each buffer it reads.
//! The read loop in [`super::worker`] is shared; only the classification
//! step differs between counting and validating scans.

use super::counts::Counts;
use super::error::ScanError;

/// Per-range result that can be merged with other ranges' results
///
/// `merge` must be associative and commutative with `Default::default()` as
/// the identity, because ranges complete in no particular order.
pub trait Partial: Default + Send + 'static {
    fn merge(&mut self, other: Self);
}

impl Partial for Counts {
    fn merge(&mut self, other: Self) {
        *self += other;
    }
}

/// Validation carries no data; success is the absence of an error
impl Partial for () {
    fn merge(&mut self, _other: Self) {}
}

/// Classification strategy applied to every buffer a worker reads
///
/// Shared by reference between all workers of a scan, so it must be `Sync`
/// and hold no per-range state; that lives in `Self::Partial`.
pub trait Classifier: Sync {
    type Partial: Partial;

    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Classify `buf`, which starts at absolute file offset `offset`
    ///
    /// Returning an error stops this worker and fails the whole scan.
    fn classify(&self, partial: &mut Self::Partial, buf: &[u8], offset: u64)
        -> Result<(), ScanError>;
}

/// Counts newline, null and tab bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCounter;

impl Classifier for ByteCounter {
    type Partial = Counts;

    fn name(&self) -> &'static str {
        "count"
    }

    #[inline]
    fn classify(&self, partial: &mut Counts, buf: &[u8], _offset: u64) -> Result<(), ScanError> {
        partial.record(buf);
        Ok(())
    }
}

/// Fails on the first null byte
#[derive(Debug, Clone, Copy, Default)]
pub struct NullValidator;

impl Classifier for NullValidator {
    type Partial = ();

    fn name(&self) -> &'static str {
        "validate"
    }

    #[inline]
    fn classify(&self, _partial: &mut (), buf: &[u8], offset: u64) -> Result<(), ScanError> {
        match memchr::memchr(0, buf) {
            Some(pos) => Err(ScanError::NullByte {
                offset: offset + pos as u64,
            }),
            None => Ok(()),
        }
    }
}
