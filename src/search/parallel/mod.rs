//! Distributed search: one coordinator, any number of pull-based workers.
//!
//! # Architecture
//!
//! - The **coordinator** runs iterative deepening. Each bound's search tree is
//!   cut into jobs, and the coordinator searches jobs itself alongside the workers.
//! - **Workers** repeatedly ask for a job, count its solutions and send the
//!   count back with their next request.
//! - A **transport** carries requests and replies: crossbeam channels for
//!   worker threads, newline-delimited JSON over TCP for other processes.
//! - A **shared tally** tracks the bound's solution count and the jobs still
//!   out with workers.
//!
//! # Example
//!
//! ```ignore
//! use rubiks::search::parallel::{ParallelConfig, run_distributed_search};
//!
//! let config = ParallelConfig::default().with_workers(4);
//! let result = run_distributed_search(&cube, &config, |bound| println!("{}", bound))?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod local;
pub mod queue;
pub mod tcp;
pub mod worker;

pub use channel::{Reply, Request, RequestHandler, TransportError, WorkerLink};
pub use config::ParallelConfig;
pub use coordinator::{Coordinator, CoordinatorHandle, run_distributed_search};
pub use tcp::TcpLink;
pub use worker::{WorkerReport, run_worker};
