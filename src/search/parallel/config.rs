//! Configuration for distributed search execution.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for distributed search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of in-process worker threads besides the coordinator.
    pub num_workers: usize,
    /// Levels of children expanded into jobs for bounds above 1.
    /// Bound 1 always expands a single level.
    pub expand_depth: u32,
    /// How long the coordinator waits on outstanding jobs before logging a warning.
    pub stall_warning: Duration,
    /// Address to accept remote TCP workers on.
    pub listen: Option<SocketAddr>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get().saturating_sub(1),
            expand_depth: 2,
            stall_warning: Duration::from_secs(30),
            listen: None,
        }
    }
}

impl ParallelConfig {
    /// Set the number of local workers. Zero leaves all work to the coordinator.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_expand_depth(mut self, depth: u32) -> Self {
        self.expand_depth = depth.max(1);
        self
    }

    pub fn with_stall_warning(mut self, interval: Duration) -> Self {
        self.stall_warning = interval;
        self
    }

    pub fn with_listen(mut self, addr: SocketAddr) -> Self {
        self.listen = Some(addr);
        self
    }

    pub fn with_listen_option(mut self, addr: Option<SocketAddr>) -> Self {
        self.listen = addr;
        self
    }

    /// Number of levels to expand when generating the job batch for `bound`.
    pub fn levels_for_bound(&self, bound: u32) -> u32 {
        if bound <= 1 { 1 } else { self.expand_depth }
    }
}
