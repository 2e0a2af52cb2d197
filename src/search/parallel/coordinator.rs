//! Distributed iterative deepening.
//!
//! For each bound the coordinator expands the root into a batch of jobs,
//! publishes them, and then searches jobs itself until the queue is empty.
//! Workers pull the rest. Once every dispatched job has reported, the bound's
//! solutions are final: zero means try the next bound, anything else ends the
//! search.

#![allow(dead_code)]

use super::channel::{Reply, Request, RequestHandler, SharedTally};
use super::config::ParallelConfig;
use super::local::local_links;
use super::queue::JobQueue;
use super::tcp::serve_tcp;
use super::worker::{WorkerReport, run_worker};
use crate::cube::{Cube, StatePool};
use crate::membership::{LocalPool, Membership};
use crate::search::engine::{count_solutions, expand_jobs};
use crate::search::result::{SolveResult, SolveStatistics};
use std::io;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Name of the group every participant joins.
pub const GROUP_NAME: &str = "rubiks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Raise the bound and publish a fresh job batch.
    Generating,
    /// Search jobs locally, then wait for dispatched jobs to report.
    Draining,
    /// Decide between the next bound and finishing.
    Advancing,
    Solved,
}

/// Request-serving side of the coordinator, shared with transport threads.
#[derive(Clone)]
pub struct CoordinatorHandle {
    queue: Arc<JobQueue>,
    tally: Arc<SharedTally>,
}

impl CoordinatorHandle {
    /// Record the previous result carried by `request`, then block until a
    /// job can be handed out or the search is solved.
    pub fn serve(&self, request: Request) -> Reply {
        if let Some(count) = request.prior_result() {
            if !self.tally.report(count) {
                tracing::warn!(count, "result reported without an outstanding job, ignored");
            }
        }

        match self.queue.take_for_dispatch(&self.tally) {
            Some(job) => Reply::job(job),
            None => Reply::done(),
        }
    }
}

impl RequestHandler for CoordinatorHandle {
    fn handle(&self, request: Request) -> Reply {
        self.serve(request)
    }

    /// Search an undeliverable job here so the bound can still settle.
    fn reclaim(&self, job: Cube) {
        tracing::warn!(bound = job.bound(), "reclaiming undelivered job");
        let mut pool = StatePool::with_capacity(job.size(), 64);
        let found = count_solutions(&job, &mut pool);
        self.tally.report(found);
    }
}

pub struct Coordinator {
    config: ParallelConfig,
    queue: Arc<JobQueue>,
    tally: Arc<SharedTally>,
}

impl Coordinator {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            queue: Arc::new(JobQueue::new()),
            tally: Arc::new(SharedTally::default()),
        }
    }

    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle {
            queue: Arc::clone(&self.queue),
            tally: Arc::clone(&self.tally),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.queue.is_solved()
    }

    /// Run iterative deepening from `root` to completion. `progress` is called
    /// with each bound as it starts.
    ///
    /// A coordinator solves one cube; requests arriving afterwards are told
    /// the search is over.
    pub fn solve(&self, root: &Cube, mut progress: impl FnMut(u32)) -> SolveResult {
        let start = Instant::now();
        let mut pool = StatePool::new(root.size());
        let mut cube = root.clone();
        let mut statistics = SolveStatistics::default();
        let mut bound = 0;
        let mut phase = Phase::Generating;

        loop {
            phase = match phase {
                Phase::Generating => {
                    bound += 1;
                    progress(bound);
                    cube.set_bound(bound);
                    self.tally.reset_solutions();

                    let levels = self.config.levels_for_bound(bound);
                    let batch = expand_jobs(&cube, levels, &mut pool);
                    tracing::info!(
                        bound,
                        jobs = batch.jobs.len(),
                        immediate = batch.immediate,
                        "publishing jobs"
                    );

                    statistics.bounds_tried += 1;
                    statistics.solutions_immediate += batch.immediate;
                    self.tally.add_solutions(batch.immediate);
                    self.queue.publish(batch.jobs);
                    Phase::Draining
                }
                Phase::Draining => {
                    while let Some(job) = self.queue.take_local() {
                        let found = count_solutions(&job, &mut pool);
                        self.tally.add_solutions(found);
                        statistics.jobs_local += 1;
                        pool.release(job);
                    }

                    self.tally.wait_settled(self.config.stall_warning, |outstanding| {
                        tracing::warn!(bound, outstanding, "still waiting on dispatched jobs");
                    });
                    Phase::Advancing
                }
                Phase::Advancing => {
                    let solutions = self.tally.solutions();
                    tracing::debug!(bound, solutions, "bound settled");
                    if solutions == 0 {
                        Phase::Generating
                    } else {
                        Phase::Solved
                    }
                }
                Phase::Solved => break,
            };
        }

        self.queue.finish();
        statistics.jobs_dispatched = self.tally.dispatched_total();
        statistics.elapsed_time = start.elapsed();
        tracing::info!(
            bound,
            jobs_local = statistics.jobs_local,
            jobs_dispatched = statistics.jobs_dispatched,
            "search solved"
        );

        SolveResult {
            solutions: self.tally.solutions(),
            bound,
            statistics,
        }
    }
}

/// Solve `root` with `config.num_workers` local worker threads, also
/// accepting TCP workers when `config.listen` is set.
pub fn run_distributed_search(
    root: &Cube,
    config: &ParallelConfig,
    progress: impl FnMut(u32),
) -> io::Result<SolveResult> {
    let participants = u32::try_from(config.num_workers + 1).unwrap_or(u32::MAX);
    let group = LocalPool::new(participants);
    let leader = group.member(0).join(GROUP_NAME);

    let coordinator = Coordinator::new(config.clone());

    if let Some(addr) = config.listen {
        let listener = TcpListener::bind(addr)?;
        tracing::info!(addr = %listener.local_addr()?, "accepting remote workers");
        serve_tcp(listener, coordinator.handle());
    }

    let (inbox, links) = local_links(&leader.peers);
    let dispatcher = inbox.serve(coordinator.handle());

    let workers: Vec<_> = links
        .into_iter()
        .map(|mut link| {
            let member = group.member(link.id().0);
            thread::spawn(move || {
                let info = member.join(GROUP_NAME);
                run_worker(info.self_id, &mut link)
            })
        })
        .collect();

    let result = coordinator.solve(root, progress);

    let mut total = WorkerReport::default();
    for worker in workers {
        match worker.join() {
            Ok(Ok(report)) => {
                total.jobs_solved += report.jobs_solved;
                total.solutions_found += report.solutions_found;
            }
            Ok(Err(err)) => tracing::warn!("worker stopped early: {}", err),
            Err(_) => tracing::warn!("worker thread panicked"),
        }
    }
    if dispatcher.join().is_err() {
        tracing::warn!("request dispatcher panicked");
    }
    tracing::debug!(
        jobs = total.jobs_solved,
        solutions = total.solutions_found,
        "local workers done"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::engine::solve_sequential;
    use std::time::Duration;

    fn config(workers: usize) -> ParallelConfig {
        ParallelConfig::default()
            .with_workers(workers)
            .with_stall_warning(Duration::from_secs(5))
    }

    #[test]
    fn test_matches_sequential() {
        for (size, twists) in [(2, 3), (3, 2)] {
            for seed in 0..3 {
                let root = Cube::scrambled(size, twists, seed).unwrap();
                let expected = solve_sequential(&root, |_| {});
                let result = run_distributed_search(&root, &config(3), |_| {}).unwrap();

                assert_eq!(result.bound, expected.bound, "size {} seed {}", size, seed);
                assert_eq!(result.solutions, expected.solutions, "size {} seed {}", size, seed);
            }
        }
    }

    #[test]
    fn test_expand_depth_does_not_change_counts() {
        let root = Cube::scrambled(2, 4, 11).unwrap();
        let expected = solve_sequential(&root, |_| {});
        for depth in 1..=3 {
            let config = config(2).with_expand_depth(depth);
            let result = run_distributed_search(&root, &config, |_| {}).unwrap();
            assert_eq!(result.solutions, expected.solutions, "depth {}", depth);
            assert_eq!(result.bound, expected.bound, "depth {}", depth);
        }
    }

    #[test]
    fn test_solved_root() {
        let mut bounds = Vec::new();
        let result =
            run_distributed_search(&Cube::solved(3), &config(2), |b| bounds.push(b)).unwrap();
        assert_eq!(result.solutions, 1);
        assert_eq!(result.bound, 1);
        assert_eq!(bounds, vec![1]);
    }

    #[test]
    fn test_coordinator_alone() {
        let root = Cube::scrambled(2, 2, 5).unwrap();
        let expected = solve_sequential(&root, |_| {});
        let result = run_distributed_search(&root, &config(0), |_| {}).unwrap();
        assert_eq!(result.solutions, expected.solutions);
        assert_eq!(result.statistics.jobs_dispatched, 0);
    }

    #[test]
    fn test_progress_reports_every_bound() {
        let root = Cube::scrambled(2, 3, 1).unwrap();
        let mut bounds = Vec::new();
        let result = run_distributed_search(&root, &config(1), |b| bounds.push(b)).unwrap();
        let expected: Vec<u32> = (1..=result.bound).collect();
        assert_eq!(bounds, expected);
        assert_eq!(result.statistics.bounds_tried, result.bound);
    }

    #[test]
    fn test_serve_after_solved() {
        let coordinator = Coordinator::new(config(0));
        let handle = coordinator.handle();
        coordinator.solve(&Cube::solved(2), |_| {});

        assert!(coordinator.is_solved());
        assert!(handle.serve(Request::first()).is_done());
    }

    #[test]
    fn test_reclaim_settles_job() {
        let coordinator = Coordinator::new(config(0));
        let handle = coordinator.handle();

        let mut job = Cube::solved(2);
        job.set_bound(1);
        coordinator.queue.publish(vec![job]);
        let Reply { job: Some(job) } = handle.serve(Request::first()) else {
            panic!("expected a job");
        };
        assert_eq!(coordinator.tally.outstanding(), 1);

        handle.reclaim(job);
        assert_eq!(coordinator.tally.outstanding(), 0);
        assert_eq!(coordinator.tally.solutions(), 1);
    }
}
