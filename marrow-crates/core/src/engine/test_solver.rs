//! Helpers to test propagators. The [`TestSolver`] posts propagators through the regular
//! constructor path and applies mutations the way a search would.
use super::Conflict;
use super::EmptyDomain;
use super::State;
use super::StateOptions;
use crate::engine::variables::BoolVar;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;

/// A container for variables and propagators, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    pub(crate) fn with_entailment_checks() -> Self {
        TestSolver {
            state: State::new(StateOptions {
                check_entailment: true,
            }),
        }
    }

    /// An enumerated variable over `[lb, ub]`.
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_enumerated_domain(lb, ub, None)
    }

    /// A variable which only keeps track of its bounds.
    pub(crate) fn new_bounded_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_domain(lb, ub, None)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.state.new_domain_from_values(&values, None)
    }

    pub(crate) fn new_boolean(&mut self) -> BoolVar {
        self.state.new_boolean(None)
    }

    /// Add the propagator and propagate to a fixed point.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Conflict>
    where
        Constructor: PropagatorConstructor,
    {
        let handle = self.state.add_propagator(constructor);
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn propagate_until_fixed_point(&mut self) -> Result<(), Conflict> {
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        self.state.contains(var, value)
    }

    pub(crate) fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.state.lower_bound(var)
    }

    pub(crate) fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.state.upper_bound(var)
    }

    pub(crate) fn remove<Var: IntegerVariable>(
        &mut self,
        var: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.state.remove(var, value)
    }

    pub(crate) fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.state.set_lower_bound(var, bound)
    }

    pub(crate) fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.state.set_upper_bound(var, bound)
    }

    pub(crate) fn instantiate<Var: IntegerVariable>(
        &mut self,
        var: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.state.instantiate(var, value)
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.state.new_checkpoint();
    }

    /// Backtrack to `level` and make the state usable again.
    pub(crate) fn synchronise(&mut self, level: usize) {
        self.state.restore_to(level);
        self.state.flush();
    }

    pub(crate) fn assert_bounds<Var: IntegerVariable>(&self, var: Var, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var.clone());
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    /// The values in the domain of `var`, in increasing order.
    pub(crate) fn values<Var: IntegerVariable>(&self, var: Var) -> Vec<i32> {
        var.iterate_domain(self.state.assignments()).collect()
    }
}
