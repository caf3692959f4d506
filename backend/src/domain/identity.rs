//! Target identity resolution and record matching.
//!
//! A logged-in actor is either a student looking at their own records or a
//! parent looking at one child's records. Everything downstream filters by
//! the resolved [`TargetIdentity`]; the `userId`/`studentId` dual-key rule
//! is applied in exactly one place ([`TargetIdentity::matches`]).

use shared::{Actor, AttendanceRecord, Child, PaymentRecord, TargetKind, TargetRef, UserRole};
use tracing::warn;

/// The person whose records are being aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetIdentity {
    pub id: i64,
    pub kind: TargetKind,
}

/// Records that carry the dual identity keys of the school backend.
///
/// Direct students are linked through `userId`, a parent's child through
/// `studentId`. A record never matches through the wrong key.
pub trait IdentityKeyed {
    fn user_id(&self) -> Option<i64>;
    fn student_id(&self) -> Option<i64>;
}

impl IdentityKeyed for AttendanceRecord {
    fn user_id(&self) -> Option<i64> {
        self.user_id
    }
    fn student_id(&self) -> Option<i64> {
        self.student_id
    }
}

impl IdentityKeyed for PaymentRecord {
    fn user_id(&self) -> Option<i64> {
        self.user_id
    }
    fn student_id(&self) -> Option<i64> {
        self.student_id
    }
}

impl TargetIdentity {
    /// Resolve the target for an actor.
    ///
    /// Students are their own target. For parents the explicitly selected
    /// child wins; with no valid selection the first child in backend order
    /// is used. A parent with zero children has no target, which is a
    /// terminal state for the view, not an error.
    pub fn resolve(
        actor: &Actor,
        children: &[Child],
        selected_child_id: Option<i64>,
    ) -> Option<TargetIdentity> {
        match actor.role {
            UserRole::Student => Some(TargetIdentity {
                id: actor.id,
                kind: TargetKind::Student,
            }),
            UserRole::Parent => {
                let selected = selected_child_id.and_then(|id| {
                    let found = children.iter().any(|c| c.id == id);
                    if !found {
                        warn!(
                            "selected child {} not among {} children of parent {}",
                            id,
                            children.len(),
                            actor.id
                        );
                    }
                    found.then_some(id)
                });
                selected
                    .or_else(|| children.first().map(|c| c.id))
                    .map(|id| TargetIdentity {
                        id,
                        kind: TargetKind::Child,
                    })
            }
        }
    }

    /// Whether a record belongs to this target, using the key that applies
    /// to the target's kind.
    pub fn matches<R: IdentityKeyed>(&self, record: &R) -> bool {
        match self.kind {
            TargetKind::Student => record.user_id() == Some(self.id),
            TargetKind::Child => record.student_id() == Some(self.id),
        }
    }

    pub fn as_ref(&self) -> TargetRef {
        TargetRef {
            id: self.id,
            kind: self.kind,
        }
    }
}
