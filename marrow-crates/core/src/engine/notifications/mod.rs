//! Turns domain mutations into propagator wake-ups.
//!
//! Mutations are recorded in the [`EventSink`] of the [`Assignments`]. After every propagator
//! call (and after every external mutation) the [`NotificationEngine`] drains the sink, asks
//! each subscribed propagator whether it wants to be enqueued, and enqueues it. The propagator
//! which caused all the events on a domain is notified, but not enqueued because of them.
mod domain_events;
mod event_sink;
mod watch_list;

pub use domain_events::DomainEvent;
pub use domain_events::DomainEvents;
pub use domain_events::IntEventType;
pub use domain_events::OpaqueDomainEvent;
pub(crate) use event_sink::DomainUpdate;
pub(crate) use event_sink::EventSink;
pub(crate) use watch_list::WatchList;
pub use watch_list::Watchers;

use log::trace;

use crate::containers::KeyedVec;
use crate::engine::cp::Assignments;
use crate::engine::cp::PropagatorQueue;
use crate::engine::cp::TrailedValues;
use crate::engine::variables::DomainId;
use crate::propagation::store::PropagatorStore;
use crate::propagation::EnqueueDecision;
use crate::propagation::PropagationContextWithTrailedValues;
use crate::propagation::PropagatorVarId;

#[derive(Default, Debug, Clone)]
pub(crate) struct NotificationEngine {
    watch_lists: KeyedVec<DomainId, WatchList>,
    /// Scratch space for the updates drained from the event sink.
    updates: Vec<DomainUpdate>,
}

impl NotificationEngine {
    pub(crate) fn grow(&mut self) {
        let _ = self.watch_lists.push(WatchList::default());
    }

    pub(crate) fn watchers(&mut self, propagator_var: PropagatorVarId) -> Watchers<'_> {
        Watchers::new(propagator_var, &mut self.watch_lists)
    }

    /// Notify the subscribers of every domain that changed since the last call.
    ///
    /// Returns the number of wake-ups that were suppressed because the subscriber caused the
    /// events itself.
    pub(crate) fn notify_propagators_about_domain_events(
        &mut self,
        assignments: &mut Assignments,
        trailed_values: &mut TrailedValues,
        propagators: &mut PropagatorStore,
        propagator_queue: &mut PropagatorQueue,
    ) -> u64 {
        self.updates.extend(assignments.drain_domain_events());

        let mut num_exempted = 0;
        for update in self.updates.drain(..) {
            let watch_list = &self.watch_lists[update.domain];

            for event in update.events {
                for &propagator_var in watch_list.watchers(event) {
                    let propagator_id = propagator_var.propagator;

                    if propagators.is_passive(propagator_id) {
                        continue;
                    }

                    // The cause is notified as well, so its incremental state follows the domains.
                    let context =
                        PropagationContextWithTrailedValues::new(assignments, trailed_values);
                    let propagator = &mut propagators[propagator_id];
                    let decision =
                        propagator.notify(context, propagator_var.variable, event.into());

                    if decision != EnqueueDecision::Enqueue {
                        continue;
                    }
                    if update.exempt == Some(propagator_id) {
                        num_exempted += 1;
                    } else {
                        trace!(
                            "enqueueing {} ({}) after {event:?} on {}",
                            propagator.name(),
                            propagator_id,
                            update.domain
                        );
                        propagator_queue.enqueue_propagator(propagator_id, propagator.priority());
                    }
                }
            }
        }

        num_exempted
    }
}
