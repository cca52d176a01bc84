use std::fmt::Display;

use crate::propagation::PropagatorId;

/// The party responsible for a domain mutation.
///
/// Every mutator takes a [`Cause`]. A propagator mutating its own scope passes
/// [`Cause::Propagator`] with its own id, which exempts it from being rescheduled by the events
/// of that mutation. There is no "unknown" cause; a mutation always has an owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A search decision, or any other mutation made from outside of propagation.
    Decision,
    /// The propagator with the given id.
    Propagator(PropagatorId),
}

impl Cause {
    pub fn propagator(self) -> Option<PropagatorId> {
        match self {
            Cause::Decision => None,
            Cause::Propagator(propagator_id) => Some(propagator_id),
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::Decision => write!(f, "decision"),
            Cause::Propagator(propagator_id) => write!(f, "{propagator_id}"),
        }
    }
}
