use crate::basic_types::PropagationStatusCP;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::variables::IntegerVariable;
use crate::engine::TrailedInteger;
use crate::propagation::DomainEvents;
use crate::propagation::EnqueueDecision;
use crate::propagation::EntailmentStatus;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::PropagationContextWithTrailedValues;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LinearLessOrEqualPropagator`].
///
/// Coefficients are expressed through views, e.g. `2x - y <= 3` is posted with
/// `x: [x.scaled(2), y.negated()]` and `c: 3`.
#[derive(Clone, Debug)]
pub struct LinearLessOrEqualPropagatorArgs<Var> {
    pub x: Box<[Var]>,
    pub c: i32,
}

impl<Var> PropagatorConstructor for LinearLessOrEqualPropagatorArgs<Var>
where
    Var: IntegerVariable,
{
    type PropagatorImpl = LinearLessOrEqualPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let LinearLessOrEqualPropagatorArgs { x, c } = self;

        // Fixed terms are moved to the right-hand side.
        let mut c = i64::from(c);
        c -= x
            .iter()
            .filter_map(|var| context.fixed_value(var))
            .map(i64::from)
            .sum::<i64>();
        let x: Box<[Var]> = x
            .iter()
            .filter(|var| !context.is_fixed(*var))
            .cloned()
            .collect();

        let mut lower_bound_left_hand_side = 0_i64;
        let mut current_bounds = vec![];

        for (i, x_i) in x.iter().enumerate() {
            context.register(
                x_i.clone(),
                DomainEvents::LOWER_BOUND,
                LocalId::from(i as u32),
            );

            let lower_bound = i64::from(context.lower_bound(x_i));
            lower_bound_left_hand_side += lower_bound;
            current_bounds.push(context.new_trailed_integer(lower_bound));
        }

        let lower_bound_left_hand_side = context.new_trailed_integer(lower_bound_left_hand_side);

        LinearLessOrEqualPropagator {
            x,
            c,
            lower_bound_left_hand_side,
            current_bounds: current_bounds.into(),
        }
    }
}

/// Bounds propagator for the constraint `\sum x_i <= c`.
#[derive(Clone, Debug)]
pub struct LinearLessOrEqualPropagator<Var> {
    x: Box<[Var]>,
    c: i64,

    /// The lower bound of the sum of the left-hand side. This is incremental state.
    lower_bound_left_hand_side: TrailedInteger,
    /// The value at index `i` is the bound for `x[i]`.
    current_bounds: Box<[TrailedInteger]>,
}

impl<Var> Propagator for LinearLessOrEqualPropagator<Var>
where
    Var: IntegerVariable,
{
    fn name(&self) -> &str {
        "LinearLeq"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn notify(
        &mut self,
        mut context: PropagationContextWithTrailedValues,
        local_id: LocalId,
        _event: OpaqueDomainEvent,
    ) -> EnqueueDecision {
        let index = local_id.unpack() as usize;
        let x_i = &self.x[index];

        let old_bound = context.value(self.current_bounds[index]);
        let new_bound = i64::from(context.lower_bound(x_i));

        // An instantiation through the upper bound also reaches this point.
        if new_bound == old_bound {
            return EnqueueDecision::Skip;
        }

        context.add_assign(self.lower_bound_left_hand_side, new_bound - old_bound);
        context.assign(self.current_bounds[index], new_bound);

        EnqueueDecision::Enqueue
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let mut lower_bound_left_hand_side = context.value(self.lower_bound_left_hand_side);

        // Terms may share a domain, in which case tightening one term raises the lower bound of
        // another and the pass has to be repeated.
        loop {
            if lower_bound_left_hand_side > self.c {
                return Err(context
                    .conflict("the lower bounds of the terms exceed the right-hand side")
                    .into());
            }

            let mut changed = false;
            for x_i in self.x.iter() {
                let lower_bound = i64::from(context.lower_bound(x_i));
                let bound = self.c - (lower_bound_left_hand_side - lower_bound);

                // The bound is at least the lower bound of `x_i`, so it fits when it is tighter.
                if bound < i64::from(context.upper_bound(x_i)) {
                    changed |= context.set_upper_bound(x_i, bound as i32)?;
                }
            }

            if !changed {
                return Ok(());
            }

            let recomputed = self
                .x
                .iter()
                .map(|x_i| i64::from(context.lower_bound(x_i)))
                .sum::<i64>();
            if recomputed == lower_bound_left_hand_side {
                return Ok(());
            }
            lower_bound_left_hand_side = recomputed;
        }
    }

    fn is_entailed(&self, context: PropagationContext) -> EntailmentStatus {
        let upper_bound_left_hand_side = self
            .x
            .iter()
            .map(|x_i| i64::from(context.upper_bound(x_i)))
            .sum::<i64>();

        if upper_bound_left_hand_side <= self.c {
            EntailmentStatus::True
        } else if context.value(self.lower_bound_left_hand_side) > self.c {
            EntailmentStatus::False
        } else {
            EntailmentStatus::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::TransformableVariable;

    #[test]
    fn test_bounds_are_propagated() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 5);
        let y = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x, y].into(),
                c: 7,
            })
            .expect("no empty domains");

        solver.assert_bounds(x, 1, 5);
        solver.assert_bounds(y, 0, 6);

        let _ = solver.set_lower_bound(y, 4).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        solver.assert_bounds(x, 1, 3);
    }

    #[test]
    fn coefficients_are_expressed_through_views() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let y = solver.new_variable(0, 4);

        let _ = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x.scaled(2), y.negated()].into(),
                c: 3,
            })
            .expect("no empty domains");
        solver.assert_bounds(x, 0, 3);
        solver.assert_bounds(y, 0, 4);

        let _ = solver.set_lower_bound(x, 2).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        solver.assert_bounds(y, 1, 4);
    }

    #[test]
    fn overloaded_lower_bounds_are_a_conflict() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 5);
        let y = solver.new_variable(4, 6);

        let conflict = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x, y].into(),
                c: 6,
            })
            .expect_err("3 + 4 > 6");

        assert_eq!(None, conflict.domain());
    }

    #[test]
    fn fixed_terms_are_moved_to_the_right_hand_side() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x, y].into(),
                c: 7,
            })
            .expect("no empty domains");

        let propagator = solver
            .state
            .get_propagator(handle)
            .expect("the handle refers to the propagator");
        assert_eq!(1, propagator.x.len());
        assert_eq!(5, propagator.c);
        solver.assert_bounds(y, 0, 5);
    }

    #[test]
    fn the_sum_is_restored_on_backtracking() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let y = solver.new_variable(0, 5);
        let _ = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x, y].into(),
                c: 5,
            })
            .expect("no empty domains");

        solver.increase_decision_level();
        let _ = solver.set_lower_bound(x, 3).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        solver.assert_bounds(y, 0, 2);

        solver.synchronise(0);
        solver.assert_bounds(y, 0, 5);

        let _ = solver.set_lower_bound(x, 1).expect("non-empty");
        solver.propagate_until_fixed_point().expect("no empty domains");
        solver.assert_bounds(y, 0, 4);
    }

    #[test]
    fn terms_over_the_same_domain_reach_a_fixed_point() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        // x - 2x <= -5
        let handle = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x.alias().alias(), x.scaled(2).negated()].into(),
                c: -5,
            })
            .expect("no empty domains");
        solver.assert_bounds(x, 5, 10);

        let propagator = solver
            .state
            .get_propagator(handle)
            .expect("the handle refers to the propagator");
        let expected_sum = propagator
            .x
            .iter()
            .map(|x_i| i64::from(solver.lower_bound(x_i.clone())))
            .sum::<i64>();
        assert_eq!(
            expected_sum,
            solver
                .state
                .trailed_values
                .read(propagator.lower_bound_left_hand_side)
        );

        let mutations = solver.state.assignments.num_mutations();
        solver
            .state
            .propagator_queue
            .enqueue_propagator(handle.propagator_id(), Priority::Low);
        solver.propagate_until_fixed_point().expect("no empty domains");
        assert_eq!(mutations, solver.state.assignments.num_mutations());
    }

    #[test]
    fn loose_sums_are_entailed() {
        let mut solver = TestSolver::with_entailment_checks();
        let x = solver.new_variable(0, 2);
        let y = solver.new_variable(0, 2);

        let handle = solver
            .new_propagator(LinearLessOrEqualPropagatorArgs {
                x: [x, y].into(),
                c: 10,
            })
            .expect("no empty domains");

        assert!(solver.state.is_propagator_passive(handle.propagator_id()));
    }
}
