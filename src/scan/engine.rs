//! Parallel range dispatcher
//!
//! The [`ScanEngine`] runs one task per [`ByteRange`] on a worker pool whose
//! size is the scan's concurrency ceiling. The number of tasks is the number
//! of ranges and may be far larger than the pool; the pool multiplexes them.
//!
//! # Delivery
//!
//! Every task sends exactly one [`RangeReport`] on a bounded channel whose
//! capacity equals the number of ranges, so a send never blocks and is never
//! dropped. The caller's thread drains the channel while the workers run.
//! The pool scope is the completion barrier: `run()` returns only after every
//! task has finished.
//!
//! # Failure
//!
//! The first worker error is claimed atomically and raises a shared
//! cancellation flag. Workers still running see the flag between reads and
//! stop. `run()` then returns that first error. Later errors are logged and
//! discarded.

use super::aggregate::{Aggregate, Aggregator, RangeOutcome, RangeReport};
use super::classify::Classifier;
use super::error::ScanError;
use super::worker::{ScanWorker, WorkerOptions};
use crate::chunk::ByteRange;
use crossbeam::channel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Default concurrency ceiling
pub const DEFAULT_THREADS: usize = 4;

/// Dispatches range workers and aggregates their results
#[derive(Debug, Clone)]
pub struct ScanEngine {
    /// Maximum number of ranges scanned at the same time
    threads: usize,
    options: WorkerOptions,
}

impl ScanEngine {
    /// Create an engine; `threads` is clamped to at least one
    pub fn new(threads: usize, options: WorkerOptions) -> Self {
        Self {
            threads: threads.max(1),
            options,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Scan every range with `classifier` and merge the results
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any worker, or
    /// [`ScanError::ThreadPool`] if the pool cannot be created.
    pub fn run<C: Classifier>(
        &self,
        ranges: Vec<ByteRange>,
        classifier: &C,
    ) -> Result<Aggregate<C::Partial>, ScanError> {
        let expected = ranges.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("chunkscan-worker-{}", i))
            .build()?;

        debug!(
            classifier = classifier.name(),
            ranges = expected,
            threads = self.threads,
            buffer_size = self.options.buffer_size,
            "dispatching range workers"
        );

        let (tx, rx) = channel::bounded::<RangeReport<C::Partial>>(expected);
        let cancel = AtomicBool::new(false);
        let first_error: OnceLock<ScanError> = OnceLock::new();
        let mut aggregator = Aggregator::new(expected);

        pool.in_place_scope(|scope| {
            for (id, range) in ranges.into_iter().enumerate() {
                let tx = tx.clone();
                let cancel = &cancel;
                let first_error = &first_error;
                let options = self.options;

                scope.spawn(move |_| {
                    let worker = ScanWorker::new(id, range, classifier, options, cancel);
                    let outcome = match worker.run() {
                        Ok(output) => RangeOutcome::Completed(output),
                        Err(ScanError::Cancelled) => RangeOutcome::Cancelled,
                        Err(err) => {
                            if let ScanError::NullByte { offset } = &err {
                                debug!(worker = id, offset, "null byte detected");
                            }
                            if let Err(later) = first_error.set(err) {
                                debug!(
                                    worker = id,
                                    error = %later,
                                    "suppressed error after first failure"
                                );
                            }
                            cancel.store(true, Ordering::Release);
                            RangeOutcome::Failed
                        }
                    };

                    // Capacity equals the range count, so this never blocks
                    if tx.send(RangeReport { id, outcome }).is_err() {
                        debug!(worker = id, "result receiver gone");
                    }
                });
            }
            drop(tx);

            for report in rx.iter().take(expected) {
                trace!(worker = report.id, "range reported");
                aggregator.absorb(report);
            }
        });

        if let Some(err) = first_error.into_inner() {
            return Err(err);
        }

        aggregator.finish()
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THREADS, WorkerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{partition, ChunkPlanner};
    use crate::scan::classify::{ByteCounter, NullValidator};
    use crate::scan::counts::Counts;
    use std::io::Write;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    /// Counts bytes while recording how many buffers are classified at once
    #[derive(Default)]
    struct ConcurrencyTracker {
        live: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Classifier for ConcurrencyTracker {
        type Partial = Counts;

        fn name(&self) -> &'static str {
            "concurrency-tracker"
        }

        fn classify(
            &self,
            partial: &mut Counts,
            buf: &[u8],
            _offset: u64,
        ) -> Result<(), ScanError> {
            let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            self.live.fetch_sub(1, Ordering::SeqCst);

            partial.record(buf);
            Ok(())
        }
    }

    /// Fails the first buffer it sees, whichever range it belongs to
    #[derive(Default)]
    struct FailFirst {
        tripped: AtomicBool,
        calls: AtomicUsize,
    }

    impl Classifier for FailFirst {
        type Partial = ();

        fn name(&self) -> &'static str {
            "fail-first"
        }

        fn classify(&self, _partial: &mut (), _buf: &[u8], offset: u64) -> Result<(), ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.tripped.swap(true, Ordering::SeqCst) {
                return Err(ScanError::NullByte { offset });
            }
            thread::sleep(Duration::from_millis(1));
            Ok(())
        }
    }

    fn temp_file(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn sample_data(len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| match i % 37 {
                0 => b'\n',
                5 => b'\t',
                11 if i % 3 == 0 => 0,
                _ => b'a' + (i % 26) as u8,
            })
            .collect()
    }

    fn ranges_for(path: &Path, n: usize) -> Vec<ByteRange> {
        ChunkPlanner::with_seed(9).plan(path, n).unwrap().ranges
    }

    #[test]
    fn test_counts_match_single_pass() {
        let data = sample_data(100_000);
        let file = temp_file(&data);
        let expected = Counts::of(&data);

        let engine = ScanEngine::new(4, WorkerOptions { buffer_size: 4096, fadvise: true });
        let aggregate = engine.run(ranges_for(file.path(), 16), &ByteCounter).unwrap();

        assert_eq!(aggregate.value, expected);
        assert_eq!(aggregate.ranges, 16);
        assert_eq!(aggregate.bytes_scanned, data.len() as u64);
    }

    #[test]
    fn test_more_ranges_than_threads() {
        let data = sample_data(50_000);
        let file = temp_file(&data);

        let engine = ScanEngine::new(1, WorkerOptions::default());
        let aggregate = engine.run(ranges_for(file.path(), 500), &ByteCounter).unwrap();

        assert_eq!(aggregate.value, Counts::of(&data));
        assert_eq!(aggregate.ranges, 500);
    }

    #[test]
    fn test_concurrency_never_exceeds_threads() {
        let data = sample_data(1024);
        let file = temp_file(&data);
        let tracker = ConcurrencyTracker::default();

        // 16-byte ranges fit one buffer each, so every range is one classify call
        let engine = ScanEngine::new(3, WorkerOptions::default());
        let aggregate = engine.run(ranges_for(file.path(), 64), &tracker).unwrap();

        let peak = tracker.peak.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak concurrency {} with 3 threads", peak);
        assert_eq!(tracker.calls.load(Ordering::SeqCst), 64);
        assert_eq!(tracker.live.load(Ordering::SeqCst), 0);
        assert_eq!(aggregate.value, Counts::of(&data));
        assert_eq!(aggregate.ranges, 64);
    }

    #[test]
    fn test_failure_cancels_remaining_ranges() {
        // 4 MiB in 16 ranges of 64 buffers each: 1024 buffers if nothing stops early
        let file = temp_file(&vec![b'a'; 4 << 20]);
        let classifier = FailFirst::default();

        let engine = ScanEngine::new(2, WorkerOptions { buffer_size: 4096, fadvise: false });
        let err = engine.run(ranges_for(file.path(), 16), &classifier).unwrap_err();

        assert!(err.is_validation_failure());
        let calls = classifier.calls.load(Ordering::SeqCst);
        assert!(calls < 64, "{} buffers classified after the first failure", calls);
    }

    #[test]
    fn test_zero_threads_clamped() {
        let engine = ScanEngine::new(0, WorkerOptions::default());
        assert_eq!(engine.threads(), 1);
    }

    #[test]
    fn test_validate_clean_file() {
        let file = temp_file(&[b'z'; 10_000]);
        let engine = ScanEngine::default();

        let aggregate = engine.run(ranges_for(file.path(), 64), &NullValidator).unwrap();
        assert_eq!(aggregate.ranges, 64);
        assert_eq!(aggregate.bytes_scanned, 10_000);
    }

    #[test]
    fn test_validate_returns_null_byte_error() {
        let mut data = vec![b'z'; 10_000];
        data[6_250] = 0;
        let file = temp_file(&data);

        let engine = ScanEngine::new(4, WorkerOptions { buffer_size: 512, fadvise: false });
        let err = engine.run(ranges_for(file.path(), 64), &NullValidator).unwrap_err();

        match err {
            ScanError::NullByte { offset } => assert_eq!(offset, 6_250),
            other => panic!("Expected NullByte, got {:?}", other),
        }
    }

    #[test]
    fn test_first_error_wins_over_cancellation() {
        // Nulls everywhere: many workers fail, exactly one error comes back
        let file = temp_file(&[0u8; 4096]);
        let engine = ScanEngine::new(8, WorkerOptions::default());

        let err = engine.run(ranges_for(file.path(), 128), &NullValidator).unwrap_err();
        assert!(err.is_validation_failure());
    }

    #[test]
    fn test_inverted_range_is_fatal() {
        let file = temp_file(b"0123456789");
        let path: Arc<Path> = Arc::from(file.path());
        let mut ranges = partition(Arc::clone(&path), 10, 2);
        ranges.push(ByteRange::new(path, 8, 3));

        let err = ScanEngine::default().run(ranges, &ByteCounter).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRange { start: 8, end: 3 }));
    }

    #[test]
    fn test_missing_file_is_fatal_io() {
        let dir = tempfile::tempdir().unwrap();
        let path: Arc<Path> = Arc::from(dir.path().join("gone.bin").as_path());
        let ranges = partition(path, 100, 4);

        let err = ScanEngine::default().run(ranges, &ByteCounter).unwrap_err();
        assert!(err.is_fatal_io());
    }

    #[test]
    fn test_no_ranges() {
        let aggregate = ScanEngine::default().run(Vec::new(), &ByteCounter).unwrap();
        assert_eq!(aggregate.ranges, 0);
        assert_eq!(aggregate.value, Counts::default());
    }
}
