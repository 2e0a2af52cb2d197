//! Request/reply messages between workers and the coordinator, plus the
//! shared counters both sides update.

#![allow(dead_code)]

use crate::cube::Cube;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Sent by a worker: the result of its previous job, or `Request::FIRST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub result: i64,
}

impl Request {
    /// Result value a worker sends with its very first request.
    pub const FIRST: i64 = -1;

    pub fn first() -> Self {
        Self {
            result: Self::FIRST,
        }
    }

    /// Report `count` solutions for the job just finished.
    pub fn report(count: u64) -> Self {
        Self {
            result: i64::try_from(count).unwrap_or(i64::MAX),
        }
    }

    /// The reported solution count, if this request carries one.
    pub fn prior_result(&self) -> Option<u64> {
        u64::try_from(self.result).ok()
    }
}

/// Sent by the coordinator: a job, or `None` once the search is solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub job: Option<Cube>,
}

impl Reply {
    pub fn job(cube: Cube) -> Self {
        Self { job: Some(cube) }
    }

    pub fn done() -> Self {
        Self { job: None }
    }

    pub fn is_done(&self) -> bool {
        self.job.is_none()
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("coordinator is no longer reachable")]
    Disconnected,
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("received a malformed job")]
    MalformedJob,
}

/// Worker side of a transport: one blocking request/reply round trip.
pub trait WorkerLink {
    fn request(&mut self, request: Request) -> Result<Reply, TransportError>;
}

/// Coordinator side of a transport. Each incoming request is handed to
/// `handle` on its own thread, since it may block until work is published.
pub trait RequestHandler: Clone + Send + 'static {
    fn handle(&self, request: Request) -> Reply;

    /// Take back a job whose reply could not be delivered.
    fn reclaim(&self, job: Cube);
}

/// Counters shared by the coordinator and every request handler.
#[derive(Debug, Default)]
pub struct SharedTally {
    /// Solutions found for the current bound.
    solutions: AtomicU64,
    /// Jobs handed out whose results have not come back yet.
    outstanding: AtomicUsize,
    /// Jobs handed out over the whole run.
    dispatched_total: AtomicU64,
    settle_lock: Mutex<()>,
    settled: Condvar,
}

impl SharedTally {
    pub fn reset_solutions(&self) {
        self.solutions.store(0, Ordering::SeqCst);
    }

    pub fn add_solutions(&self, count: u64) {
        self.solutions.fetch_add(count, Ordering::SeqCst);
    }

    pub fn solutions(&self) -> u64 {
        self.solutions.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn dispatched_total(&self) -> u64 {
        self.dispatched_total.load(Ordering::SeqCst)
    }

    /// Record a job leaving the coordinator.
    pub fn dispatched(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.dispatched_total.fetch_add(1, Ordering::SeqCst);
    }

    /// Record the result of a dispatched job. Returns false, and counts
    /// nothing, if no job was outstanding.
    pub fn report(&self, count: u64) -> bool {
        let _guard = self.settle_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.outstanding.load(Ordering::SeqCst) == 0 {
            return false;
        }
        // solutions must be visible before the decrement
        self.solutions.fetch_add(count, Ordering::SeqCst);
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        self.settled.notify_all();
        true
    }

    /// Block until no dispatched job is outstanding. `on_stall` is called
    /// with the outstanding count every `interval` spent waiting.
    pub fn wait_settled(&self, interval: Duration, mut on_stall: impl FnMut(usize)) {
        let mut guard = self.settle_lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            let (next, timeout) = self
                .settled
                .wait_timeout(guard, interval)
                .unwrap_or_else(PoisonError::into_inner);
            guard = next;

            let outstanding = self.outstanding.load(Ordering::SeqCst);
            if timeout.timed_out() && outstanding > 0 {
                on_stall(outstanding);
            }
        }
    }
}
