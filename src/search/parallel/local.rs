//! In-process transport: workers on threads talk to the coordinator over
//! crossbeam channels.

use super::channel::{Reply, Request, RequestHandler, TransportError, WorkerLink};
use crate::membership::ParticipantId;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::collections::HashMap;
use std::thread::{self, JoinHandle};

#[derive(Debug)]
struct Envelope {
    from: ParticipantId,
    request: Request,
}

/// Worker end of an in-process link.
pub struct LocalLink {
    id: ParticipantId,
    to_coordinator: Sender<Envelope>,
    replies: Receiver<Reply>,
}

impl LocalLink {
    pub fn id(&self) -> ParticipantId {
        self.id
    }
}

impl WorkerLink for LocalLink {
    fn request(&mut self, request: Request) -> Result<Reply, TransportError> {
        self.to_coordinator
            .send(Envelope {
                from: self.id,
                request,
            })
            .map_err(|_| TransportError::Disconnected)?;
        self.replies.recv().map_err(|_| TransportError::Disconnected)
    }
}

/// Coordinator end: every request from every local worker arrives here.
pub struct RequestInbox {
    requests: Receiver<Envelope>,
    reply_ports: HashMap<ParticipantId, Sender<Reply>>,
}

/// Create one link per worker, all feeding a single inbox.
pub fn local_links(workers: &[ParticipantId]) -> (RequestInbox, Vec<LocalLink>) {
    // Unbounded so a worker's send never blocks; each worker has at most one
    // request in flight, so one reply slot is enough.
    let (request_tx, request_rx) = unbounded();

    let mut reply_ports = HashMap::with_capacity(workers.len());
    let mut links = Vec::with_capacity(workers.len());
    for &id in workers {
        let (reply_tx, reply_rx) = bounded(1);
        reply_ports.insert(id, reply_tx);
        links.push(LocalLink {
            id,
            to_coordinator: request_tx.clone(),
            replies: reply_rx,
        });
    }

    let inbox = RequestInbox {
        requests: request_rx,
        reply_ports,
    };
    (inbox, links)
}

impl RequestInbox {
    /// Dispatch requests to `handler` until every link is dropped.
    ///
    /// Each request is handled on its own thread so a handler blocked on an
    /// empty queue never holds up the others.
    pub fn serve<H: RequestHandler>(self, handler: H) -> JoinHandle<()> {
        thread::spawn(move || {
            for Envelope { from, request } in self.requests.iter() {
                let Some(port) = self.reply_ports.get(&from).cloned() else {
                    tracing::warn!(%from, "request from unknown participant dropped");
                    continue;
                };

                let handler = handler.clone();
                thread::spawn(move || {
                    let reply = handler.handle(request);
                    if let Err(failed) = port.send(reply) {
                        tracing::warn!(%from, "worker gone before its reply was delivered");
                        if let Some(job) = failed.into_inner().job {
                            handler.reclaim(job);
                        }
                    }
                });
            }
            tracing::debug!("all local workers disconnected");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Hands out a fixed number of solved cubes, then reports done.
    #[derive(Clone)]
    struct Countdown {
        remaining: Arc<AtomicU64>,
        reported: Arc<AtomicU64>,
    }

    impl RequestHandler for Countdown {
        fn handle(&self, request: Request) -> Reply {
            if let Some(count) = request.prior_result() {
                self.reported.fetch_add(count, Ordering::SeqCst);
            }
            let left = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            match left {
                Ok(_) => Reply::job(Cube::solved(2)),
                Err(_) => Reply::done(),
            }
        }

        fn reclaim(&self, _job: Cube) {}
    }

    #[test]
    fn test_round_trip_through_inbox() {
        let handler = Countdown {
            remaining: Arc::new(AtomicU64::new(2)),
            reported: Arc::new(AtomicU64::new(0)),
        };
        let (inbox, mut links) = local_links(&[ParticipantId(1)]);
        let dispatcher = inbox.serve(handler.clone());

        let mut link = links.remove(0);
        assert_eq!(link.id(), ParticipantId(1));
        assert!(!link.request(Request::first()).unwrap().is_done());
        assert!(!link.request(Request::report(3)).unwrap().is_done());
        assert!(link.request(Request::report(4)).unwrap().is_done());
        assert_eq!(handler.reported.load(Ordering::SeqCst), 7);

        drop(link);
        dispatcher.join().unwrap();
    }

    #[test]
    fn test_links_share_one_inbox() {
        let handler = Countdown {
            remaining: Arc::new(AtomicU64::new(10)),
            reported: Arc::new(AtomicU64::new(0)),
        };
        let ids = [ParticipantId(1), ParticipantId(2), ParticipantId(3)];
        let (inbox, links) = local_links(&ids);
        let dispatcher = inbox.serve(handler);

        let workers: Vec<_> = links
            .into_iter()
            .map(|mut link| {
                thread::spawn(move || {
                    let mut jobs = 0;
                    let mut request = Request::first();
                    while !link.request(request).unwrap().is_done() {
                        jobs += 1;
                        request = Request::report(1);
                    }
                    jobs
                })
            })
            .collect();

        let total: u32 = workers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(total, 10);
        dispatcher.join().unwrap();
    }

    #[test]
    fn test_link_without_inbox_disconnects() {
        let (inbox, mut links) = local_links(&[ParticipantId(5)]);
        drop(inbox);
        let err = links[0].request(Request::first()).unwrap_err();
        assert!(matches!(err, TransportError::Disconnected));
    }
}
