use thiserror::Error;

use crate::engine::EmptyDomain;
use crate::propagation::PropagatorId;

/// The result of invoking a propagator. Either the propagation succeeds, or a contradiction is
/// identified, which aborts the current fixpoint.
pub type PropagationStatusCP = Result<(), Inconsistency>;

/// A contradiction raised while propagating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Inconsistency {
    /// A mutator would have emptied a domain.
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    /// The propagator found the current domains inconsistent with its constraint.
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
}

/// A conflict stated by a propagator which is _not_ the result of an empty domain, e.g. a
/// constraint whose entailment check reports it as violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{propagator} detected a conflict: {message}")]
pub struct PropagatorConflict {
    pub propagator: PropagatorId,
    pub message: &'static str,
}
