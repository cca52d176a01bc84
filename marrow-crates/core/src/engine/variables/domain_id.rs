use enumset::EnumSet;

use super::IntegerVariable;
use crate::basic_types::Cause;
use crate::containers::StorageKey;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// A structure which represents the most basic [`IntegerVariable`]; it is simply the id which
/// links to a domain (hence the name).
#[derive(Clone, PartialEq, Eq, Copy, Hash, Debug, PartialOrd, Ord)]
pub struct DomainId {
    pub id: u32,
}

impl DomainId {
    pub const fn new(id: u32) -> Self {
        DomainId { id }
    }
}

impl IntegerVariable for DomainId {
    fn domain_id(&self) -> DomainId {
        *self
    }

    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_lower_bound(*self)
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_upper_bound(*self)
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        assignments.is_value_in_domain(*self, value)
    }

    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.next_value(*self, value)
    }

    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.previous_value(*self, value)
    }

    fn remove(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.remove_value(*self, value, cause)
    }

    fn remove_interval(
        &self,
        assignments: &mut Assignments,
        from: i32,
        to: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.remove_interval(*self, from, to, cause)
    }

    fn set_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.tighten_lower_bound(*self, value, cause)
    }

    fn set_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.tighten_upper_bound(*self, value, cause)
    }

    fn update_bounds(
        &self,
        assignments: &mut Assignments,
        lower_bound: i32,
        upper_bound: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.tighten_bounds(*self, lower_bound, upper_bound, cause)
    }

    fn instantiate(
        &self,
        assignments: &mut Assignments,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        assignments.make_assignment(*self, value, cause)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        watchers.watch_all(*self, events);
    }

    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent {
        event.unwrap()
    }

    fn unpack_removed_value(&self, value: i32) -> i32 {
        value
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
