//! Chunk planning
//!
//! This module splits a file's byte range `[0, size)` into contiguous,
//! non-overlapping [`ByteRange`]s and then shuffles the order in which they
//! are handed to workers.
//!
//! # Partitioning
//!
//! The nominal width is `size / num_ranges` (at least one byte). Every range
//! has that width except the last, whose end is forced to `size` so the
//! remainder is absorbed by the final range rather than spread out.
//!
//! When more ranges are requested than the file has bytes, the plan is reduced
//! to one-byte ranges (`num_ranges = size`). An empty file always gets a
//! single empty range `[0, 0)` so that exactly one worker runs and the
//! aggregate is well defined.
//!
//! # Dispatch order
//!
//! Ranges are returned in a uniformly shuffled order so that concurrent
//! workers do not all seek near each other at the start of the file. The
//! shuffle is driven by a xoshiro256++ RNG which can be seeded for
//! reproducible runs.
//!
//! # Example
//!
//! ```
//! use chunkscan::chunk::ChunkPlanner;
//! use std::path::Path;
//!
//! let mut planner = ChunkPlanner::with_seed(7);
//! let plan = planner.plan_size(Path::new("data.bin"), 1000, 4).unwrap();
//!
//! assert_eq!(plan.ranges.len(), 4);
//! assert_eq!(plan.ranges.iter().map(|r| r.len()).sum::<u64>(), 1000);
//! ```

use crate::scan::ScanError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Half-open byte interval `[start, end)` of a file, scanned by exactly one worker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// File the range belongs to
    pub path: Arc<Path>,
    /// First byte offset (inclusive)
    pub start: u64,
    /// Last byte offset (exclusive)
    pub end: u64,
}

impl ByteRange {
    pub fn new(path: Arc<Path>, start: u64, end: u64) -> Self {
        Self { path, start, end }
    }

    /// Number of bytes covered, zero for a malformed range
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `start <= end` holds
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

/// Ranges produced for a single invocation
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    /// Size of the file at planning time
    pub file_size: u64,
    /// Ranges in dispatch order (shuffled)
    pub ranges: Vec<ByteRange>,
}

impl ChunkPlan {
    /// Number of ranges, which is also the number of workers dispatched
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Plans and shuffles byte ranges
///
/// Owns the RNG used for the dispatch-order shuffle. Use [`ChunkPlanner::new`]
/// in production and [`ChunkPlanner::with_seed`] where the order must be
/// reproducible.
pub struct ChunkPlanner {
    rng: Xoshiro256PlusPlus,
}

impl ChunkPlanner {
    /// Create a planner seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Create a planner with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Seeded planner when a seed is given, entropy-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Stat `path` and plan `num_ranges` shuffled ranges over it
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidRangeCount`] if `num_ranges` is zero
    /// - [`ScanError::Stat`] if the file's metadata cannot be read
    pub fn plan(&mut self, path: &Path, num_ranges: usize) -> Result<ChunkPlan, ScanError> {
        let metadata = std::fs::metadata(path).map_err(|source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        self.plan_size(path, metadata.len(), num_ranges)
    }

    /// Plan `num_ranges` shuffled ranges for a file of a known `size`
    pub fn plan_size(
        &mut self,
        path: &Path,
        size: u64,
        num_ranges: usize,
    ) -> Result<ChunkPlan, ScanError> {
        if num_ranges == 0 {
            return Err(ScanError::InvalidRangeCount);
        }

        let mut ranges = partition(Arc::from(path), size, num_ranges);
        ranges.shuffle(&mut self.rng);

        debug!(
            file = %path.display(),
            size,
            requested = num_ranges,
            planned = ranges.len(),
            "planned byte ranges"
        );

        Ok(ChunkPlan {
            file_size: size,
            ranges,
        })
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `[0, size)` into contiguous ranges, in file order
///
/// `num_ranges` is clamped to `max(size, 1)` so that every range is
/// well formed. A `num_ranges` of zero is treated as one.
pub fn partition(path: Arc<Path>, size: u64, num_ranges: usize) -> Vec<ByteRange> {
    let count = (num_ranges.max(1) as u64).min(size.max(1));
    let width = (size / count).max(1);

    (0..count)
        .map(|i| {
            let start = (i * width).min(size);
            let end = if i == count - 1 { size } else { start + width };
            ByteRange::new(Arc::clone(&path), start, end)
        })
        .collect()
}
