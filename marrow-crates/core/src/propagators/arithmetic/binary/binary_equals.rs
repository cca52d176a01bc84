use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntegerVariable;
use crate::engine::DeltaMonitor;
use crate::engine::EmptyDomain;
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
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`BinaryEqualsPropagator`].
#[derive(Clone, Debug)]
pub struct BinaryEqualsPropagatorArgs<AVar, BVar> {
    pub a: AVar,
    pub b: BVar,
}

impl<AVar, BVar> PropagatorConstructor for BinaryEqualsPropagatorArgs<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    type PropagatorImpl = BinaryEqualsPropagator<AVar, BVar>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BinaryEqualsPropagatorArgs { a, b } = self;

        context.register(a.clone(), DomainEvents::ANY_INT, LocalId::from(0));
        context.register(b.clone(), DomainEvents::ANY_INT, LocalId::from(1));

        BinaryEqualsPropagator {
            a_removals: context.delta_monitor(a.clone()),
            b_removals: context.delta_monitor(b.clone()),
            a,
            b,
            first_propagation_loop: true,
            num_mirrored_removals: 0,
        }
    }
}

/// Domain consistent propagator for the constraint `a = b`.
///
/// The first call intersects both domains. Afterwards only the ranges of values removed since the
/// previous call are mirrored onto the other variable.
#[derive(Clone, Debug)]
pub struct BinaryEqualsPropagator<AVar, BVar> {
    a: AVar,
    b: BVar,

    a_removals: DeltaMonitor<AVar>,
    b_removals: DeltaMonitor<BVar>,

    /// If it is the first time that the propagator is called then the domains of [`Self::a`] and
    /// [`Self::b`] have to be made equal to their intersection.
    first_propagation_loop: bool,

    num_mirrored_removals: u64,
}

impl<AVar, BVar> BinaryEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    /// Give both variables the tightest common bounds. Holes can move a bound past the common
    /// one, hence the loop.
    fn propagate_bounds(&self, context: &mut PropagationContextMut) -> Result<(), EmptyDomain> {
        loop {
            let lower_bound = context.lower_bound(&self.a).max(context.lower_bound(&self.b));
            let upper_bound = context.upper_bound(&self.a).min(context.upper_bound(&self.b));

            let a_changed = context.update_bounds(&self.a, lower_bound, upper_bound)?;
            let b_changed = context.update_bounds(&self.b, lower_bound, upper_bound)?;

            if !a_changed && !b_changed {
                return Ok(());
            }
        }
    }

    fn propagate_from_scratch(
        &mut self,
        context: &mut PropagationContextMut,
    ) -> PropagationStatusCP {
        self.propagate_bounds(context)?;

        let a_only: Vec<i32> = context
            .iterate_domain(&self.a)
            .filter(|&value| !context.contains(&self.b, value))
            .collect();
        let b_only: Vec<i32> = context
            .iterate_domain(&self.b)
            .filter(|&value| !context.contains(&self.a, value))
            .collect();

        for value in a_only {
            let _ = context.remove(&self.a, value)?;
        }
        for value in b_only {
            let _ = context.remove(&self.b, value)?;
        }

        self.a_removals.reset(&*context);
        self.b_removals.reset(&*context);
        self.first_propagation_loop = false;

        Ok(())
    }
}

impl<AVar, BVar> Propagator for BinaryEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    fn name(&self) -> &str {
        "BinaryEq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        if self.first_propagation_loop {
            return self.propagate_from_scratch(&mut context);
        }

        for (from, to) in self.a_removals.take_removed_ranges(&context) {
            if context.remove_interval(&self.b, from, to)? {
                self.num_mirrored_removals += 1;
            }
        }
        for (from, to) in self.b_removals.take_removed_ranges(&context) {
            if context.remove_interval(&self.a, from, to)? {
                self.num_mirrored_removals += 1;
            }
        }

        self.propagate_bounds(&mut context)?;
        Ok(())
    }

    fn synchronise(&mut self, context: PropagationContext) {
        // The restored domains were equal when the checkpoint was made.
        self.a_removals.reset(&context);
        self.b_removals.reset(&context);
    }

    fn is_entailed(&self, context: PropagationContext) -> EntailmentStatus {
        match (context.fixed_value(&self.a), context.fixed_value(&self.b)) {
            (Some(a), Some(b)) if a == b => EntailmentStatus::True,
            (Some(_), Some(_)) => EntailmentStatus::False,
            _ if context.upper_bound(&self.a) < context.lower_bound(&self.b)
                || context.upper_bound(&self.b) < context.lower_bound(&self.a) =>
            {
                EntailmentStatus::False
            }
            _ => EntailmentStatus::Undefined,
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        statistic_logger
            .attach_to_prefix("numMirroredRemovals")
            .log_statistic(self.num_mirrored_removals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::TransformableVariable;

    #[test]
    fn bounds_are_intersected() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(3, 8);

        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        solver.assert_bounds(a, 3, 5);
        solver.assert_bounds(b, 3, 5);
    }

    #[test]
    fn holes_are_intersected_on_the_first_call() {
        let mut solver = TestSolver::default();
        let a = solver.new_sparse_variable(vec![1, 3, 5, 7]);
        let b = solver.new_variable(2, 6);

        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        assert_eq!(vec![3, 5], solver.values(a));
        assert_eq!(vec![3, 5], solver.values(b));
    }

    #[test]
    fn later_removals_are_mirrored() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 9);
        let b = solver.new_variable(0, 9);
        let handle = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        let _ = solver.remove(a, 4).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(!solver.contains(b, 4));

        let _ = solver.remove(b, 6).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(!solver.contains(a, 6));

        let propagator = solver
            .state
            .get_propagator(handle)
            .expect("the handle refers to the propagator");
        assert_eq!(2, propagator.num_mirrored_removals);
    }

    #[test]
    fn a_bound_change_is_mirrored_as_one_mutation() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(0, 2_000_000);
        let b = solver.new_bounded_variable(0, 2_000_000);
        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        let mutations = solver.state.assignments.num_mutations();
        let _ = solver.set_lower_bound(a, 1_000_000).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");

        solver.assert_bounds(b, 1_000_000, 2_000_000);
        assert_eq!(mutations + 2, solver.state.assignments.num_mutations());
    }

    #[test]
    fn removals_are_mapped_through_views() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 10);
        let c = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs {
                a,
                b: c.scaled(2),
            })
            .expect("no empty domains");
        assert_eq!(vec![0, 2, 4, 6, 8, 10], solver.values(a));
        solver.assert_bounds(c, 0, 5);

        let _ = solver.remove(c, 2).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(!solver.contains(a, 4));
    }

    #[test]
    fn disjoint_domains_are_a_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(1, 2);
        let b = solver.new_variable(3, 4);

        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect_err("the domains do not intersect");
    }

    #[test]
    fn removals_undone_by_backtracking_are_not_mirrored() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 9);
        let b = solver.new_variable(0, 9);
        let _ = solver
            .new_propagator(BinaryEqualsPropagatorArgs { a, b })
            .expect("no empty domains");

        solver.increase_decision_level();
        let _ = solver.remove(a, 4).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(!solver.contains(b, 4));

        solver.synchronise(0);
        assert!(solver.contains(b, 4));

        let _ = solver.remove(a, 5).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert!(solver.contains(b, 4));
        assert!(!solver.contains(b, 5));
    }
}
