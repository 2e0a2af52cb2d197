//! Group membership and coordinator election.
//!
//! The solver only needs to know who it is, whether it was elected
//! coordinator, and who the other participants are. `LocalPool` provides that
//! for a closed group of in-process participants; the lowest id wins the
//! election.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant-{}", self.0)
    }
}

/// What a participant learns when it joins a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInfo {
    pub self_id: ParticipantId,
    pub coordinator: ParticipantId,
    /// Every other participant in the group.
    pub peers: Vec<ParticipantId>,
}

impl JoinInfo {
    pub fn is_coordinator(&self) -> bool {
        self.self_id == self.coordinator
    }
}

pub trait Membership {
    /// Join `group`, returning once the group is closed and a coordinator is elected.
    fn join(&self, group: &str) -> JoinInfo;
}

/// Deterministic election: the lowest participant id.
pub fn elect(participants: &[ParticipantId]) -> Option<ParticipantId> {
    participants.iter().copied().min()
}

/// A closed group of `size` participants living in one process.
#[derive(Debug, Clone, Copy)]
pub struct LocalPool {
    size: u32,
}

impl LocalPool {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        (0..self.size).map(ParticipantId).collect()
    }

    /// Handle for participant `index`.
    pub fn member(&self, index: u32) -> LocalMember {
        LocalMember {
            pool: *self,
            id: ParticipantId(index),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocalMember {
    pool: LocalPool,
    id: ParticipantId,
}

impl Membership for LocalMember {
    fn join(&self, group: &str) -> JoinInfo {
        let participants = self.pool.participants();
        let coordinator = elect(&participants).unwrap_or(self.id);
        tracing::debug!(%group, member = %self.id, %coordinator, "joined group");

        JoinInfo {
            self_id: self.id,
            coordinator,
            peers: participants.into_iter().filter(|&p| p != self.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elect_lowest() {
        let ids = [ParticipantId(4), ParticipantId(2), ParticipantId(7)];
        assert_eq!(elect(&ids), Some(ParticipantId(2)));
        assert_eq!(elect(&[]), None);
    }

    #[test]
    fn test_local_pool_join() {
        let pool = LocalPool::new(3);
        let leader = pool.member(0).join("solvers");
        assert!(leader.is_coordinator());
        assert_eq!(leader.peers, vec![ParticipantId(1), ParticipantId(2)]);

        let worker = pool.member(2).join("solvers");
        assert!(!worker.is_coordinator());
        assert_eq!(worker.coordinator, ParticipantId(0));
        assert_eq!(worker.peers.len(), 2);
    }

    #[test]
    fn test_pool_never_empty() {
        let pool = LocalPool::new(0);
        assert_eq!(pool.size(), 1);
        assert!(pool.member(0).join("solo").peers.is_empty());
    }

    #[test]
    fn test_participant_display() {
        assert_eq!(ParticipantId(3).to_string(), "participant-3");
    }
}
