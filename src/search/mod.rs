//! Optimal solution counting for scrambled cubes
//!
//! Iterative deepening over the twist bound, either in a single thread or
//! spread over a coordinator and its workers:
//! - Sequential: one depth-first search per bound
//! - Distributed: each bound split into jobs pulled by workers

pub mod config;
pub mod engine;
pub mod parallel;
pub mod result;

pub use config::{CubeSource, SolveConfig};
pub use engine::{count_solutions, expand_jobs, solve_sequential};
pub use parallel::{ParallelConfig, run_distributed_search};
pub use result::{SolveResult, SolveStatistics};

use crate::cube::Cube;
use std::io;

/// Something that finds the optimal bound for a cube and counts its solutions
pub trait Solver {
    /// Search bounds 1, 2, ... until one has solutions
    ///
    /// # Arguments
    /// * `root` - The cube to solve
    /// * `progress` - Called with each bound as its search starts
    fn solve(&mut self, root: &Cube, progress: &mut dyn FnMut(u32)) -> io::Result<SolveResult>;
}

/// Single-threaded search
#[derive(Debug, Default)]
pub struct SequentialSolver;

impl Solver for SequentialSolver {
    fn solve(&mut self, root: &Cube, progress: &mut dyn FnMut(u32)) -> io::Result<SolveResult> {
        Ok(solve_sequential(root, progress))
    }
}

/// Coordinator plus local and remote workers
#[derive(Debug, Default)]
pub struct DistributedSolver {
    config: ParallelConfig,
}

impl DistributedSolver {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }
}

impl Solver for DistributedSolver {
    fn solve(&mut self, root: &Cube, progress: &mut dyn FnMut(u32)) -> io::Result<SolveResult> {
        run_distributed_search(root, &self.config, progress)
    }
}
