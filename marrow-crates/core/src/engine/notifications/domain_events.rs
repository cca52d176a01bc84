use enum_map::Enum;
use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

#[cfg(doc)]
use crate::engine::variables::IntegerVariable;

/// The conditions a propagator can subscribe to on a variable.
///
/// A propagator registers a set of these per variable (its propagation conditions). A mutation
/// classified as [`IntEventType`] wakes every propagator whose conditions intersect
/// [`IntEventType::conditions`].
#[derive(Debug, Enum, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The variable became instantiated.
    Assign,
    /// The lower bound increased.
    LowerBound,
    /// The upper bound decreased.
    UpperBound,
    /// A value strictly between the bounds was removed.
    Removal,
}

/// The class of a single successful domain mutation.
///
/// Every mutation is classified as the tightest applicable kind, in the order
/// `Instantiate > Bound > IncLow/DecUpp > Remove`. Removing a bound value is therefore reported
/// as a bound change, not as a removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntEventType {
    Remove,
    IncLow,
    DecUpp,
    Bound,
    Instantiate,
}

impl IntEventType {
    /// Classify a mutation from what happened to the bounds of the domain.
    pub(crate) fn classify(
        lower_bound_changed: bool,
        upper_bound_changed: bool,
        fixed: bool,
    ) -> Self {
        match (lower_bound_changed, upper_bound_changed) {
            _ if fixed => IntEventType::Instantiate,
            (true, true) => IntEventType::Bound,
            (true, false) => IntEventType::IncLow,
            (false, true) => IntEventType::DecUpp,
            (false, false) => IntEventType::Remove,
        }
    }

    /// The propagation conditions woken up by this kind of event.
    ///
    /// An instantiation wakes every subscriber. A bound change only wakes the matching bound
    /// subscribers; a propagator interested in every removal has to subscribe to the bounds as
    /// well.
    pub fn conditions(self) -> EnumSet<DomainEvent> {
        match self {
            IntEventType::Remove => enum_set!(DomainEvent::Removal),
            IntEventType::IncLow => enum_set!(DomainEvent::LowerBound),
            IntEventType::DecUpp => enum_set!(DomainEvent::UpperBound),
            IntEventType::Bound => enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound),
            IntEventType::Instantiate => EnumSet::all(),
        }
    }
}

/// A set of [`DomainEvent`]s used as the propagation conditions of a propagator on a variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Any change to the bounds, including instantiation.
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Assign
    ));
    /// Any change at all.
    pub const ANY_INT: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        DomainEvent::Assign
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::UpperBound));
    pub const ASSIGN: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::Assign));
    /// Only interior removals. Removing a bound is reported as a bound change.
    pub const REMOVAL: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::Removal));

    pub const fn create_with_int_events(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(self) -> EnumSet<DomainEvent> {
        self.events
    }
}

/// A [`DomainEvent`] as it happened on the underlying domain.
///
/// Obtain the event from the perspective of a variable through [`IntegerVariable::unpack_event`];
/// a negated view sees a lower-bound event of its base as an upper-bound event.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct OpaqueDomainEvent(DomainEvent);

impl From<DomainEvent> for OpaqueDomainEvent {
    fn from(event: DomainEvent) -> Self {
        OpaqueDomainEvent(event)
    }
}

impl OpaqueDomainEvent {
    pub(crate) fn unwrap(self) -> DomainEvent {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiation_dominates_bound_changes() {
        assert_eq!(
            IntEventType::Instantiate,
            IntEventType::classify(true, false, true)
        );
        assert_eq!(IntEventType::Bound, IntEventType::classify(true, true, false));
        assert_eq!(IntEventType::IncLow, IntEventType::classify(true, false, false));
        assert_eq!(IntEventType::DecUpp, IntEventType::classify(false, true, false));
        assert_eq!(IntEventType::Remove, IntEventType::classify(false, false, false));
    }

    #[test]
    fn a_lower_bound_event_does_not_wake_removal_subscribers() {
        let conditions = DomainEvents::REMOVAL.events();

        assert!(IntEventType::IncLow.conditions().is_disjoint(conditions));
        assert!(!IntEventType::Remove.conditions().is_disjoint(conditions));
        assert!(!IntEventType::Instantiate.conditions().is_disjoint(conditions));
    }
}
