use std::fmt::Display;

use enumset::EnumSet;
use log::debug;
use log::info;
use log::trace;
use thiserror::Error;

use crate::basic_types::Cause;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::create_statistics_struct;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::NotificationEngine;
use crate::engine::variables::BoolVar;
use crate::engine::variables::BooleanVariable;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealView;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::PropagatorQueue;
use crate::engine::TrailedValues;
use crate::engine::VariableNames;
use crate::marrow_assert_eq_simple;
use crate::marrow_assert_simple;
use crate::propagation::store::PropagatorStore;
use crate::propagation::EntailmentStatus;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`State`] is the container of variables and propagators, and runs propagation to a fixed
/// point.
///
/// Backtracking is driven from the outside: the caller creates checkpoints with
/// [`State::new_checkpoint`] before making decisions, and when [`State::propagate_to_fixed_point`]
/// reports a [`Conflict`] it restores an earlier checkpoint with [`State::restore_to`] and calls
/// [`State::flush`] before touching the domains again.
#[derive(Debug)]
pub struct State {
    /// The propagators; they are notified when the events they subscribed to happen.
    pub(crate) propagators: PropagatorStore,
    /// The domains of the integer variables.
    pub(crate) assignments: Assignments,
    /// Integers which are restored on backtracking.
    pub(crate) trailed_values: TrailedValues,
    pub(crate) variable_names: VariableNames,
    /// Dictates the order in which propagators will be called to propagate.
    pub(crate) propagator_queue: PropagatorQueue,
    pub(crate) notification_engine: NotificationEngine,

    status: EngineStatus,
    /// Set once propagation at the root failed; nothing can be posted afterwards.
    infeasible_at_root: bool,
    options: StateOptions,
    statistics: StateStatistics,
}

/// Options which influence how the [`State`] propagates.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateOptions {
    /// After every successful call to a propagator, ask it whether its constraint is entailed.
    ///
    /// An entailed propagator becomes passive until the checkpoint at which it became entailed is
    /// restored; a violated constraint is reported as a conflict.
    pub check_entailment: bool,
}

/// The phase the propagation engine is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// No propagator is waiting to be called.
    Idle,
    /// At least one propagator is waiting in the queue, or a domain changed and its subscribers
    /// have not been notified yet.
    Scheduled,
    /// The queue is being drained.
    Running,
    /// A contradiction was found. Only [`State::restore_to`] and [`State::flush`] are allowed.
    Failed,
}

/// The contradiction returned by [`State::propagate_to_fixed_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("propagation failed in {propagator}: {inconsistency}")]
pub struct Conflict {
    /// The propagator which was running when the contradiction happened.
    pub propagator: PropagatorId,
    pub inconsistency: Inconsistency,
}

impl Conflict {
    /// The domain which became empty, if the conflict is due to an empty domain.
    pub fn domain(&self) -> Option<DomainId> {
        match self.inconsistency {
            Inconsistency::EmptyDomain(empty_domain) => Some(empty_domain.domain),
            Inconsistency::Conflict(_) => None,
        }
    }
}

create_statistics_struct!(StateStatistics {
    num_propagator_calls: u64,
    num_conflicts: u64,
    /// The number of wake-ups skipped because the subscriber caused the event itself.
    num_exempted_wakeups: u64,
    num_entailed: u64,
});

impl Default for State {
    fn default() -> Self {
        State::new(StateOptions::default())
    }
}

impl State {
    pub fn new(options: StateOptions) -> State {
        State {
            propagators: PropagatorStore::default(),
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            variable_names: VariableNames::default(),
            propagator_queue: PropagatorQueue::default(),
            notification_engine: NotificationEngine::default(),
            status: EngineStatus::Idle,
            infeasible_at_root: false,
            options,
            statistics: StateStatistics::default(),
        }
    }

    /// Log the statistics of the engine and of every propagator.
    pub fn log_statistics(&self) {
        log_statistic("variables", self.assignments.num_domains());
        log_statistic("propagators", self.propagators.num_propagators());
        log_statistic("passivePropagators", self.propagators.num_passive());
        log_statistic("mutations", self.assignments.num_mutations());
        self.statistics.log(StatisticLogger::default());

        for (index, propagator) in self.propagators.iter_propagators().enumerate() {
            propagator.log_statistics(StatisticLogger::new([
                propagator.name(),
                "number",
                index.to_string().as_str(),
            ]));
        }

        log_statistic_postfix();
    }
}

/// Operations to create variables.
impl State {
    /// Create a domain containing the interval `[lower_bound, upper_bound]` which only keeps
    /// track of its bounds. Removing a value from the inside of such a domain has no effect.
    pub fn new_domain(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> DomainId {
        let domain = self.assignments.grow(lower_bound, upper_bound);
        self.register_domain(domain, name);
        domain
    }

    /// Create a domain containing the interval `[lower_bound, upper_bound]` which can contain
    /// holes.
    pub fn new_enumerated_domain(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> DomainId {
        let domain = self.assignments.grow_enumerated(lower_bound, upper_bound);
        self.register_domain(domain, name);
        domain
    }

    /// Create an enumerated domain containing exactly the given values. Duplicates are ignored.
    pub fn new_domain_from_values(&mut self, values: &[i32], name: Option<&str>) -> DomainId {
        let domain = self.assignments.grow_from_values(values);
        self.register_domain(domain, name);
        domain
    }

    pub fn new_boolean(&mut self, name: Option<&str>) -> BoolVar {
        let domain = self.new_domain(0, 1, name);
        BoolVar::new(domain, &self.assignments)
    }

    fn register_domain(&mut self, domain: DomainId, name: Option<&str>) {
        self.notification_engine.grow();
        if let Some(name) = name {
            self.variable_names.add(domain, name);
        }
    }

    pub fn get_name(&self, domain: DomainId) -> Option<&str> {
        self.variable_names.get_name(domain)
    }

    pub fn get_domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.variable_names.get_domain_by_name(name)
    }
}

/// Operations to retrieve information about values.
impl State {
    pub fn lower_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.lower_bound(&self.assignments)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.upper_bound(&self.assignments)
    }

    pub fn contains<Var: IntegerVariable>(&self, variable: Var, value: i32) -> bool {
        variable.contains(&self.assignments, value)
    }

    /// Returns the value of the variable if it is fixed, and [`None`] otherwise.
    pub fn fixed_value<Var: IntegerVariable>(&self, variable: Var) -> Option<i32> {
        variable.fixed_value(&self.assignments)
    }

    pub fn is_fixed<Var: IntegerVariable>(&self, variable: Var) -> bool {
        variable.is_fixed(&self.assignments)
    }

    pub fn size<Var: IntegerVariable>(&self, variable: Var) -> u64 {
        variable.size(&self.assignments)
    }

    pub fn boolean_value<Var: BooleanVariable>(&self, variable: Var) -> Option<bool> {
        variable.boolean_value(&self.assignments)
    }

    /// The domains of all variables.
    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    /// Get the number of checkpoints that are currently stacked.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    pub fn engine_status(&self) -> EngineStatus {
        match self.status {
            EngineStatus::Failed | EngineStatus::Running => self.status,
            EngineStatus::Idle | EngineStatus::Scheduled => {
                if self.propagator_queue.is_empty() && !self.assignments.has_pending_events() {
                    EngineStatus::Idle
                } else {
                    EngineStatus::Scheduled
                }
            }
        }
    }

    /// Whether a conflict was found while propagating at the root.
    pub fn is_infeasible(&self) -> bool {
        self.infeasible_at_root
    }
}

/// Operations to modify the domains from outside of propagation.
///
/// Every mutation is made with [`Cause::Decision`] and immediately notifies the subscribed
/// propagators; a call to [`State::propagate_to_fixed_point`] runs them. A mutation which would
/// empty a domain leaves the domain untouched and puts the engine in [`EngineStatus::Failed`].
impl State {
    pub fn remove<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| variable.remove(assignments, value, Cause::Decision))
    }

    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.remove_interval(assignments, from, to, Cause::Decision)
        })
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.set_lower_bound(assignments, bound, Cause::Decision)
        })
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.set_upper_bound(assignments, bound, Cause::Decision)
        })
    }

    pub fn update_bounds<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.update_bounds(assignments, lower_bound, upper_bound, Cause::Decision)
        })
    }

    pub fn instantiate<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| variable.instantiate(assignments, value, Cause::Decision))
    }

    pub fn set_to_true<Var: BooleanVariable>(
        &mut self,
        variable: Var,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| variable.set_to_true(assignments, Cause::Decision))
    }

    pub fn set_to_false<Var: BooleanVariable>(
        &mut self,
        variable: Var,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| variable.set_to_false(assignments, Cause::Decision))
    }

    pub fn set_real_lower_bound<Var: IntegerVariable>(
        &mut self,
        variable: &RealView<Var>,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.update_lower_bound(assignments, bound, Cause::Decision)
        })
    }

    pub fn set_real_upper_bound<Var: IntegerVariable>(
        &mut self,
        variable: &RealView<Var>,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        self.apply_decision(|assignments| {
            variable.update_upper_bound(assignments, bound, Cause::Decision)
        })
    }

    fn apply_decision(
        &mut self,
        mutation: impl FnOnce(&mut Assignments) -> Result<bool, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        marrow_assert_simple!(
            self.status != EngineStatus::Failed,
            "the state must be flushed after a conflict before it can be modified"
        );

        match mutation(&mut self.assignments) {
            Ok(changed) => {
                self.notify_propagators();
                Ok(changed)
            }
            Err(empty_domain) => {
                debug!("decision failed: {empty_domain}");
                self.fail(&empty_domain);
                Err(empty_domain)
            }
        }
    }

    /// Enter [`EngineStatus::Failed`]. A failure at the root proves that the problem has no
    /// solution.
    fn fail(&mut self, reason: &impl Display) {
        self.status = EngineStatus::Failed;
        self.statistics.num_conflicts += 1;

        if self.get_checkpoint() == 0 && !self.infeasible_at_root {
            info!("the problem is infeasible at the root: {reason}");
            self.infeasible_at_root = true;
        }
    }

    fn notify_propagators(&mut self) {
        self.statistics.num_exempted_wakeups += self
            .notification_engine
            .notify_propagators_about_domain_events(
                &mut self.assignments,
                &mut self.trailed_values,
                &mut self.propagators,
                &mut self.propagator_queue,
            );
    }
}

/// Operations for adding and retrieving propagators.
impl State {
    /// Add a new propagator to the [`State`]. The constructor for that propagator should
    /// subscribe to the appropriate domain events so that the propagator is called when
    /// necessary.
    ///
    /// While the propagator is added to the queue for propagation, this function does _not_
    /// trigger a round of propagation. An explicit call to [`State::propagate_to_fixed_point`] is
    /// necessary to run the new propagator for the first time.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
    {
        let propagator_id = self.propagators.next_id();
        let constructor_context = PropagatorConstructorContext::new(propagator_id, self);
        let propagator = constructor.create(constructor_context);

        let priority = propagator.priority();
        let handle = self.propagators.add(propagator);
        marrow_assert_eq_simple!(handle.propagator_id(), propagator_id);

        self.propagator_queue
            .enqueue_propagator(handle.propagator_id(), priority);

        handle
    }

    /// Add a propagator and propagate to a fixed point.
    ///
    /// If the propagation fails at the root, the problem has no solution: the error is
    /// [`ConstraintOperationError::InfeasiblePropagator`], and every later call returns
    /// [`ConstraintOperationError::InfeasibleState`]. When the propagation fails below the root,
    /// the state is left [`EngineStatus::Failed`] and has to be restored as usual.
    pub fn post<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
    {
        if self.infeasible_at_root {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        let handle = self.add_propagator(constructor);
        match self.propagate_to_fixed_point() {
            Ok(()) => Ok(handle),
            Err(_) => Err(ConstraintOperationError::InfeasiblePropagator),
        }
    }

    /// Get a reference to the propagator identified by the given handle.
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// The events on which the propagator is woken up for its variable with the given
    /// [`LocalId`].
    pub fn propagation_conditions(
        &self,
        propagator_id: PropagatorId,
        local_id: LocalId,
    ) -> EnumSet<DomainEvent> {
        self.propagators.propagation_conditions(propagator_id, local_id)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    pub fn is_propagator_passive(&self, propagator_id: PropagatorId) -> bool {
        self.propagators.is_passive(propagator_id)
    }
}

/// Operations for propagation and backtracking.
impl State {
    /// Performs fixed-point propagation using the propagators defined in the [`State`].
    ///
    /// The external mutations and added propagators cause propagators to be enqueued when the
    /// events that they have subscribed to are triggered. As propagation causes more changes to be
    /// made, more propagators are enqueued. This continues until the queue is empty.
    ///
    /// If a propagator finds a contradiction, the remaining queue is abandoned and the [`Conflict`]
    /// is returned. The domains are not restored; the caller has to call [`State::restore_to`]
    /// and [`State::flush`]. A contradiction at the root makes the state infeasible.
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Conflict> {
        marrow_assert_simple!(
            self.status != EngineStatus::Failed,
            "the state must be flushed after a conflict before propagating again"
        );

        // The pending events are due to external mutations.
        self.notify_propagators();
        self.status = EngineStatus::Running;

        while let Some(propagator_id) = self.propagator_queue.pop() {
            if self.propagators.is_passive(propagator_id) {
                continue;
            }

            if let Err(inconsistency) = self.propagate(propagator_id) {
                let conflict = Conflict {
                    propagator: propagator_id,
                    inconsistency,
                };

                debug!("{conflict}");
                self.fail(&conflict);
                return Err(conflict);
            }
        }

        self.status = EngineStatus::Idle;
        Ok(())
    }

    /// Performs a single call to [`Propagator::propagate`] for the given propagator and notifies
    /// the propagators subscribed to its changes.
    fn propagate(&mut self, propagator_id: PropagatorId) -> Result<(), Inconsistency> {
        self.statistics.num_propagator_calls += 1;

        let propagator = &mut self.propagators[propagator_id];
        trace!("propagating {} ({propagator_id})", propagator.name());

        let context = PropagationContextMut::new(
            &mut self.assignments,
            &mut self.trailed_values,
            propagator_id,
        );
        propagator.propagate(context)?;

        if self.options.check_entailment {
            let context = PropagationContext::new(&self.assignments, &self.trailed_values);
            match self.propagators[propagator_id].is_entailed(context) {
                EntailmentStatus::True => {
                    trace!("{propagator_id} is entailed");
                    self.propagators.set_passive(propagator_id);
                    self.statistics.num_entailed += 1;
                }
                EntailmentStatus::False => {
                    return Err(PropagatorConflict {
                        propagator: propagator_id,
                        message: "the constraint is violated",
                    }
                    .into());
                }
                EntailmentStatus::Undefined => {}
            }
        }

        self.notify_propagators();
        Ok(())
    }

    /// Discard the scheduled propagators and the pending events, and leave
    /// [`EngineStatus::Failed`].
    ///
    /// This has to be called after restoring the state following a [`Conflict`], before the
    /// domains are modified again.
    pub fn flush(&mut self) {
        debug!("flushing {} scheduled propagators", self.propagator_queue.len());
        self.propagator_queue.clear();
        self.assignments.clear_events();
        self.status = EngineStatus::Idle;
    }

    /// Create a checkpoint which can later be restored with [`State::restore_to`].
    ///
    /// # Example
    /// ```rust
    /// # use marrow_core::engine::State;
    /// let mut state = State::default();
    /// let variable = state.new_domain(1, 10, None);
    ///
    /// assert_eq!(state.get_checkpoint(), 0);
    /// state.new_checkpoint();
    /// assert_eq!(state.get_checkpoint(), 1);
    ///
    /// let _ = state.set_upper_bound(variable, 5).expect("5 is in the domain");
    /// assert_eq!(state.upper_bound(variable), 5);
    ///
    /// state.restore_to(0);
    /// assert_eq!(state.get_checkpoint(), 0);
    /// assert_eq!(state.upper_bound(variable), 10);
    /// ```
    pub fn new_checkpoint(&mut self) {
        marrow_assert_simple!(
            self.propagator_queue.is_empty(),
            "Can only create a new checkpoint when all propagation has occurred"
        );
        marrow_assert_simple!(self.status != EngineStatus::Failed);

        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
        self.propagators.new_checkpoint();
        debug!("new checkpoint {}", self.get_checkpoint());
    }

    /// Restore the domains, the trailed integers and the passive propagators to the given
    /// checkpoint.
    ///
    /// If the provided checkpoint is equal to the current checkpoint, only the scheduled
    /// propagators and pending events are discarded. If the provided checkpoint is larger than the
    /// current checkpoint, this method will panic. A failed engine stays failed until
    /// [`State::flush`] is called.
    pub fn restore_to(&mut self, checkpoint: usize) {
        marrow_assert_simple!(checkpoint <= self.get_checkpoint());

        if checkpoint < self.get_checkpoint() {
            debug!("restoring checkpoint {checkpoint} from {}", self.get_checkpoint());

            self.assignments.synchronise(checkpoint);
            self.trailed_values.synchronise(checkpoint);
            self.propagators.synchronise(checkpoint);

            for propagator in self.propagators.iter_propagators_mut() {
                let context = PropagationContext::new(&self.assignments, &self.trailed_values);
                propagator.synchronise(context);
            }
        }

        self.propagator_queue.clear();
        self.assignments.clear_events();
    }
}
