use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enum_map::Enum;

use super::LocalId;
use super::PropagationContext;
use super::PropagationContextMut;
use super::PropagationContextWithTrailedValues;
use crate::basic_types::PropagationStatusCP;
#[cfg(doc)]
use crate::basic_types::PropagatorConflict;
#[cfg(doc)]
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
#[cfg(doc)]
use crate::engine::State;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// We need to use this to cast from `Box<dyn Propagator>` to the concrete propagator behind a
// `PropagatorHandle`; rust does not allow downcasting from the trait object by itself.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution of its
/// constraint, or raises explicit conflicts.
///
/// The only required functions are [`Propagator::name`] and [`Propagator::propagate`]; all other
/// functions have default implementations.
///
/// See the [`crate::propagation`] documentation for more details.
pub trait Propagator: Downcast {
    /// Return the name of the propagator.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Remove values which cannot be part of any solution given the current domains.
    ///
    /// Every mutation made through the context has this propagator as its cause, so the
    /// propagator is not woken up by its own changes. In case a mutation would empty a domain,
    /// or the propagator finds the current domains inconsistent, an [`Err`] is returned and the
    /// fixpoint is aborted.
    ///
    /// A propagator does not have to reach its own fixpoint in one call, but once it is at
    /// fixpoint, calling it again must not change any domain.
    fn propagate(&mut self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Returns whether the propagator should be enqueued when a [`DomainEvent`] happens to one
    /// of the variables it registered for (see [`PropagatorConstructorContext::register`]).
    ///
    /// This is called with the domains as they are after the event and should only contain
    /// cheap logic. By default the propagator is always enqueued.
    fn notify(
        &mut self,
        _context: PropagationContextWithTrailedValues,
        _local_id: LocalId,
        _event: OpaqueDomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after the [`State`] restored an earlier checkpoint, to let the propagator bring
    /// internal state which is not trailed up to date with the restored domains.
    fn synchronise(&mut self, _context: PropagationContext) {}

    /// The queue this propagator is scheduled in. Cheaper propagators should use a more urgent
    /// priority so that they run first within a fixpoint.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Whether the constraint is satisfied by every assignment of the current domains
    /// ([`EntailmentStatus::True`]), by none of them ([`EntailmentStatus::False`]), or whether
    /// this cannot be decided yet.
    ///
    /// Only asked when entailment checks are enabled on the [`State`]. An entailed propagator
    /// is not scheduled again until the checkpoint at which it became entailed is restored; a
    /// violated one raises a [`PropagatorConflict`].
    fn is_entailed(&self, _context: PropagationContext) -> EntailmentStatus {
        EntailmentStatus::Undefined
    }

    /// Log statistics collected by the propagator, if any.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The queues of the propagator queue, from the most to the least urgent.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Enum)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    VeryLow,
}

/// The three-valued answer of [`Propagator::is_entailed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntailmentStatus {
    True,
    False,
    Undefined,
}
