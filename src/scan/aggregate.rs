//! Fan-in of per-range results
//!
//! The [`Aggregator`] is the single consumer of the engine's result channel.
//! It expects exactly one [`RangeReport`] per dispatched range and merges the
//! successful ones into one value. Receipt order is irrelevant because
//! [`Partial::merge`] is commutative.

use super::classify::Partial;
use super::error::ScanError;
use super::worker::RangeOutput;

/// How a single range ended
#[derive(Debug)]
pub enum RangeOutcome<P> {
    /// The range was fully read and classified
    Completed(RangeOutput<P>),
    /// The worker failed; the error itself is held by the engine
    Failed,
    /// The worker stopped because another worker failed
    Cancelled,
}

/// Message sent by every worker exactly once
#[derive(Debug)]
pub struct RangeReport<P> {
    /// Worker ID
    pub id: usize,
    pub outcome: RangeOutcome<P>,
}

/// Merged result of all ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate<P> {
    pub value: P,
    /// Ranges that reported
    pub ranges: usize,
    /// Bytes read across all ranges
    pub bytes_scanned: u64,
}

/// Collects range reports into an [`Aggregate`]
#[derive(Debug)]
pub struct Aggregator<P: Partial> {
    expected: usize,
    received: usize,
    failed: usize,
    cancelled: usize,
    bytes_scanned: u64,
    value: P,
}

impl<P: Partial> Aggregator<P> {
    /// Create an aggregator waiting for `expected` reports
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            received: 0,
            failed: 0,
            cancelled: 0,
            bytes_scanned: 0,
            value: P::default(),
        }
    }

    /// Whether every expected report has arrived
    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    /// Whether any range failed or was cancelled
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.cancelled > 0
    }

    /// Absorb one worker's report
    pub fn absorb(&mut self, report: RangeReport<P>) {
        self.received += 1;
        match report.outcome {
            RangeOutcome::Completed(output) => {
                self.bytes_scanned += output.bytes_read;
                self.value.merge(output.partial);
            }
            RangeOutcome::Failed => self.failed += 1,
            RangeOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Finish aggregation
    ///
    /// # Errors
    ///
    /// - [`ScanError::MissingResults`] if fewer reports arrived than expected
    /// - [`ScanError::Cancelled`] if any range did not complete; the engine
    ///   replaces this with the error that caused it
    pub fn finish(self) -> Result<Aggregate<P>, ScanError> {
        if self.received != self.expected {
            return Err(ScanError::MissingResults {
                expected: self.expected,
                received: self.received,
            });
        }
        if self.has_failures() {
            return Err(ScanError::Cancelled);
        }

        Ok(Aggregate {
            value: self.value,
            ranges: self.received,
            bytes_scanned: self.bytes_scanned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::counts::Counts;

    fn completed(id: usize, counts: Counts, bytes_read: u64) -> RangeReport<Counts> {
        RangeReport {
            id,
            outcome: RangeOutcome::Completed(RangeOutput {
                partial: counts,
                bytes_read,
            }),
        }
    }

    #[test]
    fn test_sums_counts() {
        let mut aggregator = Aggregator::new(3);
        aggregator.absorb(completed(2, Counts::new(1, 0, 2), 10));
        aggregator.absorb(completed(0, Counts::new(0, 3, 0), 10));
        aggregator.absorb(completed(1, Counts::new(4, 0, 0), 5));

        assert!(aggregator.is_complete());
        let aggregate = aggregator.finish().unwrap();
        assert_eq!(aggregate.value, Counts::new(5, 3, 2));
        assert_eq!(aggregate.ranges, 3);
        assert_eq!(aggregate.bytes_scanned, 25);
    }

    #[test]
    fn test_receipt_order_irrelevant() {
        let parts = [
            Counts::new(1, 2, 3),
            Counts::new(7, 0, 1),
            Counts::new(0, 0, 9),
            Counts::new(2, 2, 2),
        ];

        let mut forward = Aggregator::new(parts.len());
        for (i, c) in parts.iter().enumerate() {
            forward.absorb(completed(i, *c, 1));
        }

        let mut backward = Aggregator::new(parts.len());
        for (i, c) in parts.iter().enumerate().rev() {
            backward.absorb(completed(i, *c, 1));
        }

        assert_eq!(forward.finish().unwrap(), backward.finish().unwrap());
    }

    #[test]
    fn test_missing_results() {
        let mut aggregator = Aggregator::new(4);
        aggregator.absorb(completed(0, Counts::default(), 0));

        match aggregator.finish() {
            Err(ScanError::MissingResults { expected, received }) => {
                assert_eq!(expected, 4);
                assert_eq!(received, 1);
            }
            other => panic!("Expected MissingResults, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_range_fails_aggregate() {
        let mut aggregator: Aggregator<Counts> = Aggregator::new(2);
        aggregator.absorb(completed(0, Counts::new(1, 1, 1), 3));
        aggregator.absorb(RangeReport {
            id: 1,
            outcome: RangeOutcome::Failed,
        });

        assert!(aggregator.has_failures());
        assert!(matches!(aggregator.finish(), Err(ScanError::Cancelled)));
    }

    #[test]
    fn test_unit_partial() {
        let mut aggregator: Aggregator<()> = Aggregator::new(2);
        for id in 0..2 {
            aggregator.absorb(RangeReport {
                id,
                outcome: RangeOutcome::Completed(RangeOutput {
                    partial: (),
                    bytes_read: 8,
                }),
            });
        }

        let aggregate = aggregator.finish().unwrap();
        assert_eq!(aggregate.bytes_scanned, 16);
    }
}
