use enumset::EnumSet;

use super::DomainEvent;
use super::IntEventType;
use crate::basic_types::Cause;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorId;

/// Who caused the events accumulated on one domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventCause {
    Single(Cause),
    /// Several parties changed the domain; nobody is exempt from the resulting wake-ups.
    Mixed,
}

/// The events accumulated on a single domain since the sink was last drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DomainUpdate {
    pub(crate) domain: DomainId,
    pub(crate) events: EnumSet<DomainEvent>,
    /// The propagator which should not be woken up by these events, because it made all of the
    /// changes itself.
    pub(crate) exempt: Option<PropagatorId>,
}

/// While a propagator runs, the mutations it performs are captured in the event sink. When the
/// propagator finishes, the sink is drained to notify all the propagators that subscribe to
/// those events.
///
/// Events are merged per domain, so a propagator watching a domain is considered once per drain
/// regardless of how many mutations happened.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    present: KeyedVec<DomainId, EnumSet<DomainEvent>>,
    causes: KeyedVec<DomainId, Option<EventCause>>,
    touched: Vec<DomainId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
        let _ = self.causes.push(None);
    }

    pub(crate) fn event_occurred(&mut self, domain: DomainId, event: IntEventType, cause: Cause) {
        if self.present[domain].is_empty() {
            self.touched.push(domain);
        }
        self.present[domain] |= event.conditions();

        self.causes[domain] = match self.causes[domain] {
            None => Some(EventCause::Single(cause)),
            Some(EventCause::Single(previous)) if previous == cause => {
                Some(EventCause::Single(cause))
            }
            Some(_) => Some(EventCause::Mixed),
        };
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = DomainUpdate> + '_ {
        self.touched.drain(..).map(|domain| {
            let events = std::mem::take(&mut self.present[domain]);
            let exempt = match self.causes[domain].take() {
                Some(EventCause::Single(cause)) => cause.propagator(),
                Some(EventCause::Mixed) | None => None,
            };

            DomainUpdate {
                domain,
                events,
                exempt,
            }
        })
    }

    pub(crate) fn clear(&mut self) {
        let _ = self.drain().count();
    }
}
