use crate::basic_types::Cause;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::BooleanVariable;
use crate::engine::variables::DomainValues;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealView;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::propagation::PropagatorId;

/// A structure through which the current domains can be read.
pub trait HasAssignments {
    /// Returns the stored [`Assignments`].
    fn assignments(&self) -> &Assignments;
}

impl HasAssignments for Assignments {
    fn assignments(&self) -> &Assignments {
        self
    }
}

/// Read access to the domains of variables, available on every context.
pub trait ReadDomains: HasAssignments {
    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        var.is_fixed(self.assignments())
    }

    fn fixed_value<Var: IntegerVariable>(&self, var: &Var) -> Option<i32> {
        var.fixed_value(self.assignments())
    }

    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.assignments(), value)
    }

    fn size<Var: IntegerVariable>(&self, var: &Var) -> u64 {
        var.size(self.assignments())
    }

    fn iterate_domain<'a, Var: IntegerVariable>(&'a self, var: &'a Var) -> DomainValues<'a, Var> {
        var.iterate_domain(self.assignments())
    }

    fn boolean_value<Var: BooleanVariable>(&self, var: &Var) -> Option<bool> {
        var.boolean_value(self.assignments())
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// Read-only view on the state, given to propagators outside of propagation (when they are
/// notified, synchronised, or asked for entailment).
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a TrailedValues,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
        }
    }

    /// The current value of a trailed integer.
    pub fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// The context given to [`Propagator::notify`](crate::propagation::Propagator::notify): the
/// domains can be read, and trailed integers can be updated.
#[derive(Debug)]
pub struct PropagationContextWithTrailedValues<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
}

impl<'a> PropagationContextWithTrailedValues<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a mut TrailedValues) -> Self {
        PropagationContextWithTrailedValues {
            assignments,
            trailed_values,
        }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext::new(self.assignments, &*self.trailed_values)
    }

    pub fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values.add_assign(trailed_integer, addition);
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value);
    }
}

impl HasAssignments for PropagationContextWithTrailedValues<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// The context of a running propagator. Domains are read through [`ReadDomains`] and changed
/// through the mutators, which all use the running propagator as the [`Cause`].
///
/// Every mutator returns `Ok(true)` when the domain changed, `Ok(false)` when the change was
/// already implied, and an [`EmptyDomain`] otherwise; the latter converts into an
/// [`Inconsistency`](crate::basic_types::Inconsistency) with `?`.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
    pub(crate) propagator_id: PropagatorId,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagationContextMut {
            assignments,
            trailed_values,
            propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// The cause attached to every mutation made through this context.
    pub fn cause(&self) -> Cause {
        Cause::Propagator(self.propagator_id)
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext::new(self.assignments, self.trailed_values)
    }

    /// A conflict stating that the constraint of the running propagator is violated.
    pub fn conflict(&self, message: &'static str) -> PropagatorConflict {
        PropagatorConflict {
            propagator: self.propagator_id,
            message,
        }
    }

    pub fn remove<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.remove(self.assignments, value, cause)
    }

    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.remove_interval(self.assignments, from, to, cause)
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.set_lower_bound(self.assignments, bound, cause)
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.set_upper_bound(self.assignments, bound, cause)
    }

    pub fn update_bounds<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.update_bounds(self.assignments, lower_bound, upper_bound, cause)
    }

    pub fn instantiate<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.instantiate(self.assignments, value, cause)
    }

    pub fn set_to_true<Var: BooleanVariable>(&mut self, var: &Var) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.set_to_true(self.assignments, cause)
    }

    pub fn set_to_false<Var: BooleanVariable>(&mut self, var: &Var) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.set_to_false(self.assignments, cause)
    }

    pub fn update_real_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &RealView<Var>,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.update_lower_bound(self.assignments, bound, cause)
    }

    pub fn update_real_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &RealView<Var>,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        let cause = self.cause();
        var.update_upper_bound(self.assignments, bound, cause)
    }

    /// The current value of a trailed integer.
    pub fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    /// Add `addition` to a trailed integer; undone when the current checkpoint is restored.
    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values.add_assign(trailed_integer, addition);
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value);
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
