//! The coordinator's job queue.
//!
//! Jobs are published once per bound and drained from both ends: the
//! coordinator takes jobs for itself while request handlers block here until
//! a job is available or the search is solved.

#![allow(dead_code)]

use super::channel::SharedTally;
use crate::cube::Cube;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct QueueState {
    jobs: Vec<Cube>,
    /// Set when a batch is published, cleared once the queue is seen empty.
    ready: bool,
    solved: bool,
}

#[derive(Debug, Default)]
pub struct JobQueue {
    state: Mutex<QueueState>,
    job_available: Condvar,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a batch of jobs and wake every blocked requester.
    pub fn publish(&self, jobs: Vec<Cube>) {
        let mut state = self.lock();
        state.jobs.extend(jobs);
        state.ready = true;
        drop(state);
        self.job_available.notify_all();
    }

    /// Take a job for the coordinator itself, never blocking.
    pub fn take_local(&self) -> Option<Cube> {
        let mut state = self.lock();
        let job = state.jobs.pop();
        if job.is_none() {
            state.ready = false;
        }
        job
    }

    /// Take a job for a remote worker, blocking until one is published.
    ///
    /// The job is counted as outstanding in `tally` before the queue lock is
    /// released. Returns `None` once the search is solved.
    pub fn take_for_dispatch(&self, tally: &SharedTally) -> Option<Cube> {
        let mut state = self.lock();
        loop {
            if state.solved {
                return None;
            }
            if state.ready {
                match state.jobs.pop() {
                    Some(job) => {
                        tally.dispatched();
                        return Some(job);
                    }
                    None => state.ready = false,
                }
            }
            state = self
                .job_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark the search solved and release every blocked requester.
    pub fn finish(&self) {
        let mut state = self.lock();
        state.solved = true;
        state.ready = true;
        drop(state);
        self.job_available.notify_all();
    }

    pub fn is_solved(&self) -> bool {
        self.lock().solved
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn jobs(count: usize) -> Vec<Cube> {
        (0..count).map(|_| Cube::solved(2)).collect()
    }

    #[test]
    fn test_local_take_drains() {
        let queue = JobQueue::new();
        queue.publish(jobs(3));
        assert_eq!(queue.len(), 3);

        let mut taken = 0;
        while queue.take_local().is_some() {
            taken += 1;
        }
        assert_eq!(taken, 3);
        assert!(queue.is_empty());
        assert!(!queue.is_solved());
    }

    #[test]
    fn test_dispatch_counts_outstanding() {
        let queue = JobQueue::new();
        let tally = SharedTally::default();
        queue.publish(jobs(2));

        assert!(queue.take_for_dispatch(&tally).is_some());
        assert_eq!(tally.outstanding(), 1);
        assert!(queue.take_local().is_some());
        assert_eq!(tally.outstanding(), 1);
        assert_eq!(tally.dispatched_total(), 1);
    }

    #[test]
    fn test_dispatch_blocks_until_publish() {
        let queue = Arc::new(JobQueue::new());
        let tally = Arc::new(SharedTally::default());

        let requester = {
            let queue = Arc::clone(&queue);
            let tally = Arc::clone(&tally);
            thread::spawn(move || queue.take_for_dispatch(&tally))
        };

        thread::sleep(Duration::from_millis(50));
        assert_eq!(tally.outstanding(), 0);

        queue.publish(jobs(1));
        let job = requester.join().unwrap();
        assert!(job.is_some());
        assert_eq!(tally.outstanding(), 1);
    }

    #[test]
    fn test_finish_releases_requesters() {
        let queue = Arc::new(JobQueue::new());
        let tally = Arc::new(SharedTally::default());

        let requesters: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let tally = Arc::clone(&tally);
                thread::spawn(move || queue.take_for_dispatch(&tally))
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        queue.finish();

        for requester in requesters {
            assert!(requester.join().unwrap().is_none());
        }
        assert!(queue.is_solved());
        assert_eq!(tally.outstanding(), 0);
    }

    #[test]
    fn test_solved_queue_hands_out_nothing() {
        let queue = JobQueue::new();
        let tally = SharedTally::default();
        queue.publish(jobs(2));
        queue.finish();
        assert!(queue.take_for_dispatch(&tally).is_none());
    }
}
