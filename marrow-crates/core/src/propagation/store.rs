use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use enumset::EnumSet;

use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::notifications::DomainEvent;

/// A handle to a propagator which was added to the [`State`](crate::engine::State), which
/// remembers the concrete type of the propagator.
#[derive(Debug)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    /// Get the type-erased id of the propagator.
    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

/// A central store for propagators, together with what the engine keeps per propagator: the
/// propagation conditions of every registered variable and whether it is passive.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    conditions: KeyedVec<PropagatorId, Vec<(LocalId, EnumSet<DomainEvent>)>>,
    is_passive: KeyedVec<PropagatorId, bool>,
    /// The propagators which became passive, per checkpoint.
    passive_trail: Trail<PropagatorId>,
}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The id the next added propagator will get.
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn add<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        let id = self.propagators.push(Box::new(propagator));
        self.is_passive.accomodate(id, false);
        self.conditions.accomodate(id, Vec::new());

        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    pub(crate) fn iter_propagators_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    /// Get a reference to the propagator identified by the given handle.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }

    pub(crate) fn record_conditions(
        &mut self,
        propagator_id: PropagatorId,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) {
        self.conditions.accomodate(propagator_id, Vec::new());
        let conditions = &mut self.conditions[propagator_id];

        match conditions.iter_mut().find(|(id, _)| *id == local_id) {
            Some((_, registered)) => *registered |= events,
            None => conditions.push((local_id, events)),
        }
    }

    /// The events the propagator registered for on the variable with the given local id.
    pub(crate) fn propagation_conditions(
        &self,
        propagator_id: PropagatorId,
        local_id: LocalId,
    ) -> EnumSet<DomainEvent> {
        self.conditions
            .get(propagator_id)
            .and_then(|conditions| conditions.iter().find(|(id, _)| *id == local_id))
            .map_or(EnumSet::empty(), |(_, events)| *events)
    }

    pub(crate) fn is_passive(&self, propagator_id: PropagatorId) -> bool {
        self.is_passive
            .get(propagator_id)
            .copied()
            .unwrap_or(false)
    }

    pub(crate) fn num_passive(&self) -> usize {
        self.is_passive.iter().filter(|&&passive| passive).count()
    }

    /// Stop scheduling the propagator until the current checkpoint is restored.
    pub(crate) fn set_passive(&mut self, propagator_id: PropagatorId) {
        if !self.is_passive[propagator_id] {
            self.is_passive[propagator_id] = true;
            self.passive_trail.push(propagator_id);
        }
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.passive_trail.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        self.passive_trail
            .synchronise(checkpoint)
            .for_each(|propagator_id| self.is_passive[propagator_id] = false);
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self
            .propagators
            .iter()
            .map(|propagator| propagator.name())
            .collect();

        write!(f, "{names:?}")
    }
}
