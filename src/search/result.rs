//! Search result types and statistics

use std::time::Duration;

/// Outcome of an iterative-deepening solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    /// Number of distinct optimal solutions
    pub solutions: u64,
    /// Optimal solution length, i.e. the first bound with any solution
    pub bound: u32,
    /// Statistics from the search
    pub statistics: SolveStatistics,
}

impl SolveResult {
    /// The line the solver prints on success.
    pub fn summary(&self) -> String {
        format!(
            "Solving cube possible in {} ways of {} steps",
            self.solutions, self.bound
        )
    }
}

/// Statistics from a solve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStatistics {
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Number of bounds attempted (including the successful one)
    pub bounds_tried: u32,
    /// Jobs searched by the coordinator itself
    pub jobs_local: u64,
    /// Jobs handed out to workers
    pub jobs_dispatched: u64,
    /// Solutions counted while generating job batches
    pub solutions_immediate: u64,
}

impl SolveStatistics {
    /// Total number of jobs searched across all participants.
    pub fn total_jobs(&self) -> u64 {
        self.jobs_local + self.jobs_dispatched
    }

    /// Share of jobs that went to workers (0.0 to 1.0)
    pub fn dispatch_rate(&self) -> f64 {
        let total = self.total_jobs();
        if total == 0 {
            0.0
        } else {
            self.jobs_dispatched as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let result = SolveResult {
            solutions: 4,
            bound: 3,
            statistics: SolveStatistics::default(),
        };
        assert_eq!(result.summary(), "Solving cube possible in 4 ways of 3 steps");
    }

    #[test]
    fn test_dispatch_rate() {
        let mut stats = SolveStatistics::default();
        assert_eq!(stats.dispatch_rate(), 0.0);

        stats.jobs_local = 30;
        stats.jobs_dispatched = 10;
        assert_eq!(stats.total_jobs(), 40);
        assert!((stats.dispatch_rate() - 0.25).abs() < 1e-10);
    }
}
