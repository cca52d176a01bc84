use enumset::EnumSet;

use super::IntegerVariable;
use crate::basic_types::Cause;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::marrow_assert_simple;

/// The continuous relaxation of an integer variable.
///
/// Real bounds are rounded onto the integers with a tolerance of `precision`: a lower bound of
/// `2.0000001` with a precision of `1e-6` still admits the value 2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealView<Var> {
    base: Var,
    precision: f64,
}

impl<Var: IntegerVariable> RealView<Var> {
    pub fn new(base: Var, precision: f64) -> Self {
        marrow_assert_simple!(
            precision.is_finite() && precision >= 0.0,
            "the precision of a real view has to be a finite non-negative number, got {precision}"
        );

        RealView { base, precision }
    }

    pub fn base(&self) -> &Var {
        &self.base
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn lower_bound(&self, assignments: &Assignments) -> f64 {
        f64::from(self.base.lower_bound(assignments))
    }

    pub fn upper_bound(&self, assignments: &Assignments) -> f64 {
        f64::from(self.base.upper_bound(assignments))
    }

    pub fn is_instantiated(&self, assignments: &Assignments) -> bool {
        self.base.is_fixed(assignments)
    }

    /// Whether an integer of the base lies within `precision` of `value`.
    pub fn contains(&self, assignments: &Assignments, value: f64) -> bool {
        let nearest = value.round();
        (nearest - value).abs() <= self.precision
            && nearest >= f64::from(i32::MIN)
            && nearest <= f64::from(i32::MAX)
            && self.base.contains(assignments, nearest as i32)
    }

    /// Raise the lower bound to the smallest integer not below `value - precision`.
    pub fn update_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: f64,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        marrow_assert_simple!(!value.is_nan(), "a real bound cannot be NaN");

        let bound = (value - self.precision).ceil();
        if bound > f64::from(i32::MAX) {
            return Err(self.empty(cause, "real lower bound above every integer"));
        }
        if bound <= f64::from(i32::MIN) {
            return Ok(false);
        }

        self.base.set_lower_bound(assignments, bound as i32, cause)
    }

    /// Lower the upper bound to the largest integer not above `value + precision`.
    pub fn update_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: f64,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        marrow_assert_simple!(!value.is_nan(), "a real bound cannot be NaN");

        let bound = (value + self.precision).floor();
        if bound < f64::from(i32::MIN) {
            return Err(self.empty(cause, "real upper bound below every integer"));
        }
        if bound >= f64::from(i32::MAX) {
            return Ok(false);
        }

        self.base.set_upper_bound(assignments, bound as i32, cause)
    }

    pub fn update_bounds(
        &self,
        assignments: &mut Assignments,
        lower_bound: f64,
        upper_bound: f64,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        let lower_changed = self.update_lower_bound(assignments, lower_bound, cause)?;
        let upper_changed = self.update_upper_bound(assignments, upper_bound, cause)?;
        Ok(lower_changed || upper_changed)
    }

    pub fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        self.base.watch_all(watchers, events);
    }

    /// The event as seen on the relaxation, which orders values like the relaxed variable.
    pub fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent {
        self.base.unpack_event(event)
    }

    fn empty(&self, cause: Cause, reason: &'static str) -> EmptyDomain {
        EmptyDomain {
            domain: self.base.domain_id(),
            cause,
            reason,
        }
    }
}
