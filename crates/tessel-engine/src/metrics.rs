//! Per-traversal metrics.
//!
//! [`TraversalMetrics`] captures counts and timing for the most recent
//! traversal a problem ran.

use tessel_loop::TraversalStats;

/// Counts and timing collected during one traversal.
///
/// Durations are in microseconds. The problem overwrites these after
/// every traversal, successful or not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalMetrics {
    /// Which operation ran, e.g. `"initial conditions"` or `"residual"`.
    pub phase: String,
    /// Elements whose visit completed without error.
    pub elements_visited: usize,
    /// Elements whose visit failed.
    pub elements_failed: usize,
    /// Elements never visited because the traversal was cancelled.
    pub elements_skipped: usize,
    /// Leaf sub-ranges dispatched.
    pub leaves: usize,
    /// Faults dropped because one was already recorded.
    pub faults_suppressed: usize,
    /// Wall-clock time of the traversal, in microseconds.
    pub total_us: u64,
}

impl TraversalMetrics {
    /// Assemble metrics from loop counters.
    pub fn from_stats(
        phase: impl Into<String>,
        stats: TraversalStats,
        faults_suppressed: usize,
        total_us: u64,
    ) -> Self {
        Self {
            phase: phase.into(),
            elements_visited: stats.visited,
            elements_failed: stats.failed,
            elements_skipped: stats.skipped,
            leaves: stats.leaves,
            faults_suppressed,
            total_us,
        }
    }

    /// Total elements the traversal accounted for.
    pub fn elements_total(&self) -> usize {
        self.elements_visited + self.elements_failed + self.elements_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TraversalMetrics::default();
        assert!(m.phase.is_empty());
        assert_eq!(m.elements_total(), 0);
        assert_eq!(m.leaves, 0);
        assert_eq!(m.faults_suppressed, 0);
        assert_eq!(m.total_us, 0);
    }

    #[test]
    fn from_stats_copies_counters() {
        let stats = TraversalStats {
            visited: 90,
            failed: 1,
            skipped: 9,
            leaves: 4,
        };
        let m = TraversalMetrics::from_stats("residual", stats, 2, 150);
        assert_eq!(m.phase, "residual");
        assert_eq!(m.elements_visited, 90);
        assert_eq!(m.elements_failed, 1);
        assert_eq!(m.elements_skipped, 9);
        assert_eq!(m.elements_total(), 100);
        assert_eq!(m.leaves, 4);
        assert_eq!(m.faults_suppressed, 2);
        assert_eq!(m.total_us, 150);
    }
}
