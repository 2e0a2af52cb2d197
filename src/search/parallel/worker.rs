//! Worker loop: request a job, count its solutions, report back, repeat.

use super::channel::{Request, TransportError, WorkerLink};
use crate::cube::StatePool;
use crate::membership::ParticipantId;
use crate::search::engine::count_solutions;

/// What a worker did before the coordinator told it to stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub jobs_solved: u64,
    pub solutions_found: u64,
}

/// Serve the coordinator behind `link` until it replies with no job.
///
/// The state pool is created on the first job, sized from that job's cube,
/// and replaced if a job of another size arrives.
pub fn run_worker<L: WorkerLink>(
    id: ParticipantId,
    link: &mut L,
) -> Result<WorkerReport, TransportError> {
    let mut report = WorkerReport::default();
    let mut pool: Option<StatePool> = None;
    let mut request = Request::first();

    tracing::debug!(worker = %id, "worker started");
    loop {
        let reply = link.request(request)?;
        let Some(job) = reply.job else {
            break;
        };
        if !job.is_well_formed() {
            return Err(TransportError::MalformedJob);
        }

        if pool.as_ref().is_some_and(|p| p.cube_size() != job.size()) {
            pool = None;
        }
        let pool = pool.get_or_insert_with(|| StatePool::new(job.size()));
        let found = count_solutions(&job, pool);
        pool.release(job);

        report.jobs_solved += 1;
        report.solutions_found += found;
        request = Request::report(found);
    }

    tracing::debug!(
        worker = %id,
        jobs = report.jobs_solved,
        solutions = report.solutions_found,
        "worker finished"
    );
    Ok(report)
}
