use std::fmt::Debug;

use enumset::EnumSet;

use super::DomainId;
use super::DomainValues;
use crate::basic_types::Cause;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// The behaviour shared by domains and views over them.
///
/// Queries never fail. Every mutator returns `Ok(true)` if the domain changed, `Ok(false)` if the
/// request was already satisfied, and [`EmptyDomain`] if honouring it would leave no values, in
/// which case nothing is changed. Mutators take the [`Cause`] of the change, which is exempt from
/// the wake-ups the change triggers.
pub trait IntegerVariable: Clone + Debug + 'static {
    /// The domain which stores the values of this variable.
    fn domain_id(&self) -> DomainId;

    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, assignments: &Assignments, value: i32) -> bool;

    /// The number of values in the domain.
    fn size(&self, assignments: &Assignments) -> u64 {
        assignments.get_size(self.domain_id())
    }

    fn is_fixed(&self, assignments: &Assignments) -> bool {
        self.lower_bound(assignments) == self.upper_bound(assignments)
    }

    /// The value of the variable if it is instantiated.
    fn fixed_value(&self, assignments: &Assignments) -> Option<i32> {
        let lower_bound = self.lower_bound(assignments);
        (lower_bound == self.upper_bound(assignments)).then_some(lower_bound)
    }

    /// The smallest value in the domain strictly larger than `value`.
    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// The largest value in the domain strictly smaller than `value`.
    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// Iterate over the domain from the smallest to the largest value.
    fn iterate_domain<'a>(&'a self, assignments: &'a Assignments) -> DomainValues<'a, Self> {
        DomainValues::ascending(self, assignments)
    }

    fn remove(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    /// Remove every value in `[from, to]`.
    fn remove_interval(
        &self,
        assignments: &mut Assignments,
        from: i32,
        to: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    fn set_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    fn set_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    /// Tighten both bounds in a single mutation.
    fn update_bounds(
        &self,
        assignments: &mut Assignments,
        lower_bound: i32,
        upper_bound: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    /// Reduce the domain to `{value}`; fails if `value` is not in the domain.
    fn instantiate(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);

    /// Decode a domain event for this variable.
    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent;

    /// Map a value removed from the underlying domain to the value it represents for this
    /// variable.
    fn unpack_removed_value(&self, value: i32) -> i32;
}
