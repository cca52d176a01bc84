use std::cmp::Ordering;

use enumset::EnumSet;

use super::transform::Rounding;
use super::DomainId;
use super::IntegerVariable;
use super::Transform;
use crate::basic_types::Cause;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::marrow_assert_simple;

/// A variable expressed as a [`Transform`] of another variable.
///
/// The view owns no domain. Every query maps the answer of the wrapped variable through the
/// transform, and every mutation is mapped back and applied to the wrapped variable. Views nest,
/// so `x.scaled(3).negated()` is the view `-(3 * x)`.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct IntView<Var> {
    base: Var,
    transform: Transform,
}

impl<Var: IntegerVariable> IntView<Var> {
    pub fn new(base: Var, transform: Transform) -> Self {
        if let Transform::Scale(factor) = transform {
            marrow_assert_simple!(
                factor > 0,
                "a scale view needs a strictly positive factor, got {factor}"
            );
        }

        IntView { base, transform }
    }

    pub fn base(&self) -> &Var {
        &self.base
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The inclusive range of base values whose images lie in `[from, to]`, if any.
    fn invert_range(&self, from: i32, to: i32) -> Option<(i32, i32)> {
        let (low, high) = if self.transform.is_decreasing() {
            (
                self.transform.invert(to, Rounding::Up),
                self.transform.invert(from, Rounding::Down),
            )
        } else {
            (
                self.transform.invert(from, Rounding::Up),
                self.transform.invert(to, Rounding::Down),
            )
        };

        (low <= high).then_some((low, high))
    }
}

impl<Var: IntegerVariable> IntegerVariable for IntView<Var> {
    fn domain_id(&self) -> DomainId {
        self.base.domain_id()
    }

    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        if self.transform.is_decreasing() {
            self.transform.apply(self.base.upper_bound(assignments))
        } else {
            self.transform.apply(self.base.lower_bound(assignments))
        }
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        if self.transform.is_decreasing() {
            self.transform.apply(self.base.lower_bound(assignments))
        } else {
            self.transform.apply(self.base.upper_bound(assignments))
        }
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        self.transform
            .invert_exact(value)
            .is_some_and(|inverted| self.base.contains(assignments, inverted))
    }

    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        let next = if self.transform.is_decreasing() {
            self.base
                .previous_value(assignments, self.transform.invert(value, Rounding::Up))
        } else {
            self.base
                .next_value(assignments, self.transform.invert(value, Rounding::Down))
        };

        next.map(|next| self.transform.apply(next)).filter(|&next| next > value)
    }

    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        let previous = if self.transform.is_decreasing() {
            self.base
                .next_value(assignments, self.transform.invert(value, Rounding::Down))
        } else {
            self.base
                .previous_value(assignments, self.transform.invert(value, Rounding::Up))
        };

        previous
            .map(|previous| self.transform.apply(previous))
            .filter(|&previous| previous < value)
    }

    fn remove(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        match self.transform.invert_exact(value) {
            Some(inverted) => self.base.remove(assignments, inverted, cause),
            None => Ok(false),
        }
    }

    fn remove_interval(
        &self,
        assignments: &mut Assignments,
        from: i32,
        to: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        match self.invert_range(from, to) {
            Some((low, high)) => self.base.remove_interval(assignments, low, high, cause),
            None => Ok(false),
        }
    }

    fn set_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        if self.transform.is_decreasing() {
            let inverted = self.transform.invert(value, Rounding::Down);
            self.base.set_upper_bound(assignments, inverted, cause)
        } else {
            let inverted = self.transform.invert(value, Rounding::Up);
            self.base.set_lower_bound(assignments, inverted, cause)
        }
    }

    fn set_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        if self.transform.is_decreasing() {
            let inverted = self.transform.invert(value, Rounding::Up);
            self.base.set_lower_bound(assignments, inverted, cause)
        } else {
            let inverted = self.transform.invert(value, Rounding::Down);
            self.base.set_upper_bound(assignments, inverted, cause)
        }
    }

    fn update_bounds(
        &self,
        assignments: &mut Assignments,
        lower_bound: i32,
        upper_bound: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        match self.invert_range(lower_bound, upper_bound) {
            Some((low, high)) => self.base.update_bounds(assignments, low, high, cause),
            None => Err(EmptyDomain {
                domain: self.domain_id(),
                cause,
                reason: "no value of the view between the new bounds",
            }),
        }
    }

    fn instantiate(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        match self.transform.invert_exact(value) {
            Some(inverted) => self.base.instantiate(assignments, inverted, cause),
            None => Err(EmptyDomain {
                domain: self.domain_id(),
                cause,
                reason: "instantiation value is not a multiple of the scale factor",
            }),
        }
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        self.base
            .watch_all(watchers, self.transform.translate_events(events));
    }

    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent {
        self.transform
            .translate_event(self.base.unpack_event(event))
    }

    fn unpack_removed_value(&self, value: i32) -> i32 {
        self.transform.apply(self.base.unpack_removed_value(value))
    }
}

impl<Var: std::fmt::Debug> std::fmt::Debug for IntView<Var> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.transform {
            Transform::Identity => write!(f, "{:?}", self.base),
            Transform::Negation => write!(f, "-({:?})", self.base),
            Transform::Scale(factor) => write!(f, "{factor} * ({:?})", self.base),
            Transform::Offset(offset) => match offset.cmp(&0) {
                Ordering::Less => write!(f, "({:?}) - {}", self.base, -(offset as i64)),
                Ordering::Equal => write!(f, "({:?})", self.base),
                Ordering::Greater => write!(f, "({:?}) + {offset}", self.base),
            },
            Transform::BoolNot => write!(f, "not({:?})", self.base),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::variables::TransformableVariable;

    #[test]
    fn negation_view_swaps_bounds() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 5);
        let y = x.negated();

        assert_eq!(-5, y.lower_bound(&assignments));
        assert_eq!(-2, y.upper_bound(&assignments));

        let changed = y
            .set_lower_bound(&mut assignments, -4, Cause::Decision)
            .expect("non-empty");

        assert!(changed);
        assert_eq!(2, x.lower_bound(&assignments));
        assert_eq!(4, x.upper_bound(&assignments));
        assert_eq!(-4, y.lower_bound(&assignments));
        assert_eq!(-2, y.upper_bound(&assignments));
    }

    #[test]
    fn scale_view_rejects_instantiation_to_a_non_multiple() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 2);
        let z = x.scaled(3);

        let result = z.instantiate(&mut assignments, 4, Cause::Decision);

        assert!(matches!(result, Err(EmptyDomain { domain, .. }) if domain == x));
        assert_eq!(0, x.lower_bound(&assignments));
        assert_eq!(2, x.upper_bound(&assignments));
    }

    #[test]
    fn scale_view_ignores_removal_of_a_non_multiple() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 4);
        let z = x.scaled(3);

        assert_eq!(Ok(false), z.remove(&mut assignments, 7, Cause::Decision));
        assert_eq!(Ok(true), z.remove(&mut assignments, 6, Cause::Decision));
        assert!(!x.contains(&assignments, 2));
    }

    #[test]
    fn scale_view_bounds_round_inwards() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(-10, 10);
        let z = x.scaled(4);

        let _ = z
            .set_lower_bound(&mut assignments, -7, Cause::Decision)
            .expect("non-empty");
        let _ = z
            .set_upper_bound(&mut assignments, 9, Cause::Decision)
            .expect("non-empty");

        assert_eq!(-1, x.lower_bound(&assignments));
        assert_eq!(2, x.upper_bound(&assignments));
        assert_eq!(-4, z.lower_bound(&assignments));
        assert_eq!(8, z.upper_bound(&assignments));
    }

    #[test]
    fn removing_an_interval_through_a_negated_offset_view() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 10);
        let view = x.offset(5).negated();

        let _ = view
            .remove_interval(&mut assignments, -12, -9, Cause::Decision)
            .expect("non-empty");

        assert_eq!(
            vec![0, 1, 2, 3, 8, 9, 10],
            x.iterate_domain(&assignments).collect::<Vec<_>>()
        );
    }

    #[test]
    fn next_and_previous_value_through_a_negation() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_from_values(&[1, 3, 7]);
        let y = x.negated();

        assert_eq!(Some(-3), y.next_value(&assignments, -7));
        assert_eq!(Some(-1), y.next_value(&assignments, -2));
        assert_eq!(None, y.next_value(&assignments, -1));
        assert_eq!(Some(-7), y.previous_value(&assignments, -4));
    }

    #[test]
    fn update_bounds_without_a_multiple_in_range_fails() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);
        let z = x.scaled(5);

        assert!(z
            .update_bounds(&mut assignments, 6, 9, Cause::Decision)
            .is_err());
        assert_eq!(10, x.upper_bound(&assignments));
    }

    #[test]
    fn bound_events_are_swapped_for_decreasing_views() {
        let x = DomainId::new(0);

        assert_eq!(
            DomainEvent::UpperBound,
            x.negated().unpack_event(DomainEvent::LowerBound.into())
        );
        assert_eq!(
            DomainEvent::LowerBound,
            x.negated()
                .negated()
                .unpack_event(DomainEvent::LowerBound.into())
        );
        assert_eq!(
            DomainEvent::Removal,
            x.scaled(2).unpack_event(DomainEvent::Removal.into())
        );
    }

    #[test]
    fn views_agree_with_their_base_under_random_mutations() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut assignments = Assignments::default();
            let x = assignments.grow_enumerated(-20, 20);
            let negated = x.negated();
            let scaled = x.scaled(3);

            for _ in 0..10 {
                let value = rng.gen_range(-25..=25);
                let result = match rng.gen_range(0..3) {
                    0 => x.remove(&mut assignments, value, Cause::Decision),
                    1 => negated.set_lower_bound(&mut assignments, value, Cause::Decision),
                    _ => scaled.set_upper_bound(&mut assignments, value * 3, Cause::Decision),
                };
                if result.is_err() {
                    break;
                }

                assert_eq!(
                    -x.upper_bound(&assignments),
                    negated.lower_bound(&assignments)
                );
                assert_eq!(
                    -x.lower_bound(&assignments),
                    negated.upper_bound(&assignments)
                );
                for v in -70..=70 {
                    assert_eq!(
                        v % 3 == 0 && x.contains(&assignments, v / 3),
                        scaled.contains(&assignments, v)
                    );
                }
            }
        }
    }

    #[test]
    fn views_near_the_limits_of_i32_do_not_overflow() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, i32::MAX);
        let y = assignments.grow(i32::MIN, 0);

        assert_eq!(i32::MAX, x.scaled(2).upper_bound(&assignments));
        assert_eq!(0, x.scaled(2).lower_bound(&assignments));
        assert_eq!(i32::MAX, y.negated().upper_bound(&assignments));

        assert_eq!(
            Ok(false),
            y.negated()
                .set_lower_bound(&mut assignments, i32::MIN, Cause::Decision)
        );
        assert!(x
            .offset(10)
            .set_upper_bound(&mut assignments, i32::MIN + 5, Cause::Decision)
            .is_err());
        assert_eq!(
            Ok(true),
            x.offset(10)
                .set_lower_bound(&mut assignments, i32::MAX, Cause::Decision)
        );
        assert_eq!(i32::MAX - 10, x.lower_bound(&assignments));
        assert!(!y.negated().contains(&assignments, i32::MIN));
    }

    #[test]
    #[should_panic]
    fn scale_view_with_non_positive_factor_panics() {
        let _ = DomainId::new(0).scaled(0);
    }
}
