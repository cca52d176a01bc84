use enum_map::EnumMap;
use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorVarId;

/// The propagators watching a single domain, bucketed by the event they subscribed to.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchList {
    watchers: EnumMap<DomainEvent, Vec<PropagatorVarId>>,
}

impl WatchList {
    pub(crate) fn watchers(&self, event: DomainEvent) -> &[PropagatorVarId] {
        &self.watchers[event]
    }

    fn watch(&mut self, event: DomainEvent, propagator_var: PropagatorVarId) {
        let bucket = &mut self.watchers[event];
        if !bucket.contains(&propagator_var) {
            bucket.push(propagator_var);
        }
    }
}

/// Registers one variable of one propagator with the watch lists of the underlying domains.
///
/// Views translate the requested events into the coordinates of their base before handing them
/// to [`Watchers::watch_all`].
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    watch_lists: &'a mut KeyedVec<DomainId, WatchList>,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(
        propagator_var: PropagatorVarId,
        watch_lists: &'a mut KeyedVec<DomainId, WatchList>,
    ) -> Self {
        Watchers {
            propagator_var,
            watch_lists,
        }
    }

    pub fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        let watch_list = &mut self.watch_lists[domain];
        for event in events {
            watch_list.watch(event, self.propagator_var);
        }
    }
}
