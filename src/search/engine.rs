//! Bounded depth-first search that counts every solution within a cube's bound.

use crate::cube::{Cube, StatePool};
use crate::search::result::{SolveResult, SolveStatistics};
use std::time::Instant;

/// Count the solutions reachable from `cube` in at most `cube.bound()` twists.
///
/// A solved cube counts as one solution regardless of the remaining depth
/// budget. Every child is handed back to `pool` once its subtree is done.
pub fn count_solutions(cube: &Cube, pool: &mut StatePool) -> u64 {
    if cube.is_solved() {
        return 1;
    }

    if cube.twists() >= cube.bound() {
        return 0;
    }

    let mut children = pool.take_batch();
    cube.generate_children_into(pool, &mut children);

    let mut result = 0;
    for child in children.drain(..) {
        result += count_solutions(&child, pool);
        pool.release(child);
    }

    pool.return_batch(children);
    result
}

/// A bound's worth of work, split into independently solvable jobs.
#[derive(Debug, Default)]
pub struct JobBatch {
    /// Solutions found while expanding (solved cubes above the job frontier).
    pub immediate: u64,
    /// Subtrees still to be searched.
    pub jobs: Vec<Cube>,
}

/// Split the search below `root` into jobs by expanding `levels` levels of
/// children.
///
/// Applies the same cut-offs as `count_solutions`, so for any bound
/// `immediate + sum(count_solutions(job))` equals `count_solutions(root)`.
pub fn expand_jobs(root: &Cube, levels: u32, pool: &mut StatePool) -> JobBatch {
    let mut batch = JobBatch::default();
    let mut frontier = vec![root.clone()];

    for _ in 0..levels {
        let mut next = Vec::with_capacity(frontier.len() * Cube::children_per_state(root.size()));
        for cube in frontier.drain(..) {
            if cube.is_solved() {
                batch.immediate += 1;
                pool.release(cube);
            } else if cube.twists() >= cube.bound() {
                pool.release(cube);
            } else {
                cube.generate_children_into(pool, &mut next);
                pool.release(cube);
            }
        }
        frontier = next;
    }

    batch.jobs = frontier;
    batch
}

/// Iterative deepening in a single thread: bound 1, 2, ... until the first
/// bound with any solution.
pub fn solve_sequential(root: &Cube, mut progress: impl FnMut(u32)) -> SolveResult {
    let start = Instant::now();
    let mut pool = StatePool::new(root.size());
    let mut cube = root.clone();
    let mut statistics = SolveStatistics::default();

    let mut bound = 0;
    let mut solutions = 0;
    while solutions == 0 {
        bound += 1;
        progress(bound);
        tracing::debug!(bound, "searching");

        cube.set_bound(bound);
        solutions = count_solutions(&cube, &mut pool);
        statistics.bounds_tried += 1;
        statistics.jobs_local += 1;
    }

    statistics.elapsed_time = start.elapsed();
    SolveResult {
        solutions,
        bound,
        statistics,
    }
}
