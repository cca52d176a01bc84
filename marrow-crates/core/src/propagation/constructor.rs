use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealView;
use crate::engine::Assignments;
use crate::engine::DeltaMonitor;
use crate::engine::State;
use crate::engine::TrailedInteger;
use crate::propagation::HasAssignments;
use crate::propagation::PropagationContext;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued. Additionally, the propagator can be initialized with values that come from the state
/// of the solver.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// Propagators use it to register to domain changes of variables, to allocate trailed state and
/// to retrieve the current domains of variables.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    propagator_id: PropagatorId,
    /// A [`LocalId`] that is guaranteed not to be used to register any variables yet.
    next_local_id: LocalId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
            next_local_id: LocalId::from(0),
        }
    }

    /// The id the propagator will have once it is added.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Get domain information.
    pub fn domains(&self) -> PropagationContext<'_> {
        PropagationContext::new(&self.state.assignments, &self.state.trailed_values)
    }

    /// Subscribes the propagator to the given [`DomainEvents`].
    ///
    /// The domain events determine when [`Propagator::notify()`] will be called on the propagator.
    /// The [`LocalId`] is internal information related to the propagator,
    /// which is used when calling [`Propagator::notify()`] to identify the variable.
    ///
    /// Each variable *must* have a unique [`LocalId`]. Most often this would be its index of the
    /// variable in the internal array of variables. The registered events are remembered as the
    /// propagation conditions of that variable.
    pub fn register(
        &mut self,
        var: impl IntegerVariable,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let mut watchers = self.start_watching(domain_events, local_id);
        var.watch_all(&mut watchers, domain_events.events());
    }

    /// Subscribes the propagator to the events of a continuous relaxation, see
    /// [`PropagatorConstructorContext::register`].
    ///
    /// The events are those of the relaxed variable. A relaxation has no removals of its own, so
    /// it cannot be followed with a [`DeltaMonitor`].
    pub fn register_real<Var: IntegerVariable>(
        &mut self,
        var: &RealView<Var>,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let mut watchers = self.start_watching(domain_events, local_id);
        var.watch_all(&mut watchers, domain_events.events());
    }

    fn start_watching(&mut self, domain_events: DomainEvents, local_id: LocalId) -> Watchers<'_> {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        self.update_next_local_id(local_id);
        self.state
            .propagators
            .record_conditions(self.propagator_id, local_id, domain_events.events());

        self.state.notification_engine.watchers(propagator_var)
    }

    /// Allocate an integer which is restored when the state backtracks.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.state.trailed_values.grow(initial_value)
    }

    /// A monitor over the values removed from `var` from now on, skipping the removals made by
    /// the propagator under construction.
    pub fn delta_monitor<Var: IntegerVariable>(&self, var: Var) -> DeltaMonitor<Var> {
        let mut monitor = DeltaMonitor::new(var, self.propagator_id);
        monitor.reset(&self.state.assignments);
        monitor
    }

    /// Get a new [`LocalId`] which is guaranteed to be unused.
    pub fn get_next_local_id(&self) -> LocalId {
        self.next_local_id
    }

    /// Set the next local id to be at least one more than the largest encountered local id.
    fn update_next_local_id(&mut self, local_id: LocalId) {
        self.next_local_id = self
            .next_local_id
            .max(LocalId::from(local_id.unpack() + 1));
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        &self.state.assignments
    }
}
