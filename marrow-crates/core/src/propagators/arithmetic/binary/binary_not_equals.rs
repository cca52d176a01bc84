use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntegerVariable;
use crate::propagation::DomainEvents;
use crate::propagation::EntailmentStatus;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagatorArgs<AVar, BVar> {
    pub a: AVar,
    pub b: BVar,
}

impl<AVar, BVar> PropagatorConstructor for BinaryNotEqualsPropagatorArgs<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    type PropagatorImpl = BinaryNotEqualsPropagator<AVar, BVar>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BinaryNotEqualsPropagatorArgs { a, b } = self;

        // We only care about the case where one of the two is assigned
        context.register(a.clone(), DomainEvents::ASSIGN, LocalId::from(0));
        context.register(b.clone(), DomainEvents::ASSIGN, LocalId::from(1));

        BinaryNotEqualsPropagator { a, b }
    }
}

/// Propagator for the constraint `a != b`.
///
/// Once one side is fixed, its value is removed from the other side. On a domain which only keeps
/// track of its bounds this only has an effect when the value is a bound.
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagator<AVar, BVar> {
    a: AVar,
    b: BVar,
}

impl<AVar, BVar> Propagator for BinaryNotEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        if let Some(value) = context.fixed_value(&self.a) {
            let _ = context.remove(&self.b, value)?;
        }

        if let Some(value) = context.fixed_value(&self.b) {
            let _ = context.remove(&self.a, value)?;
        }

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> EntailmentStatus {
        if context.upper_bound(&self.a) < context.lower_bound(&self.b)
            || context.upper_bound(&self.b) < context.lower_bound(&self.a)
        {
            return EntailmentStatus::True;
        }

        match (context.fixed_value(&self.a), context.fixed_value(&self.b)) {
            (Some(a), Some(b)) if a == b => EntailmentStatus::False,
            (Some(a), _) if !context.contains(&self.b, a) => EntailmentStatus::True,
            (_, Some(b)) if !context.contains(&self.a, b) => EntailmentStatus::True,
            _ => EntailmentStatus::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::EngineStatus;

    #[test]
    fn detects_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(0, 0);

        let _ = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect_err("Expected conflict to be detected");
    }

    #[test]
    fn propagate_when_one_is_fixed() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(3, 3);
        let b = solver.new_variable(1, 5);

        let _ = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        assert!(!solver.contains(b, 3));
        assert_eq!(vec![1, 2, 4, 5], solver.values(b));
    }

    #[test]
    fn bound_changes_do_not_wake_the_propagator() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let _ = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        let _ = solver.set_lower_bound(a, 1).expect("non-empty");
        assert_eq!(EngineStatus::Idle, solver.state.engine_status());

        let _ = solver.instantiate(a, 2).expect("non-empty");
        assert_eq!(EngineStatus::Scheduled, solver.state.engine_status());
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(!solver.contains(b, 2));
    }

    #[test]
    fn disjoint_domains_are_entailed() {
        let mut solver = TestSolver::with_entailment_checks();
        let a = solver.new_variable(0, 2);
        let b = solver.new_variable(5, 7);

        let handle = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        assert!(solver.state.is_propagator_passive(handle.propagator_id()));
    }
}
