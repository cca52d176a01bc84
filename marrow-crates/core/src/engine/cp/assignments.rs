use log::debug;
use thiserror::Error;

use super::delta::Delta;
use super::delta::DeltaEntry;
use super::domain::DomainKind;
use super::domain::IntegerDomain;
use crate::basic_types::Cause;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::notifications::DomainUpdate;
use crate::engine::notifications::EventSink;
use crate::engine::notifications::IntEventType;
use crate::engine::variables::DomainId;
use crate::marrow_assert_simple;

/// The contradiction raised when a mutation would leave a domain without values.
///
/// The offending mutation is not applied, so the domain is still in the state it was in before
/// the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the domain of {domain} would become empty ({reason}), caused by {cause}")]
pub struct EmptyDomain {
    pub domain: DomainId,
    pub cause: Cause,
    pub reason: &'static str,
}

#[derive(Clone, Copy, Debug)]
enum DomainChange {
    /// The bounds and size of the domain before a bound update.
    Bounds {
        domain: DomainId,
        lower_bound: i32,
        upper_bound: i32,
        size: u64,
    },
    /// A hole punched into an enumerated domain.
    Removal { domain: DomainId, value: i32 },
}

/// The domains of all integer variables, together with everything needed to undo, observe and
/// report changes to them.
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    domains: KeyedVec<DomainId, IntegerDomain>,
    trail: Trail<DomainChange>,
    deltas: KeyedVec<DomainId, Delta>,
    events: EventSink,
    epoch: u64,
    num_mutations: u64,
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        marrow_assert_simple!(lower_bound <= upper_bound, "cannot create an empty domain");
        self.add_domain(IntegerDomain::bounded(lower_bound, upper_bound))
    }

    pub(crate) fn grow_enumerated(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        marrow_assert_simple!(lower_bound <= upper_bound, "cannot create an empty domain");
        self.add_domain(IntegerDomain::enumerated(lower_bound, upper_bound))
    }

    pub(crate) fn grow_from_values(&mut self, values: &[i32]) -> DomainId {
        let mut sorted_values = values.to_vec();
        sorted_values.sort_unstable();
        sorted_values.dedup();
        marrow_assert_simple!(!sorted_values.is_empty(), "cannot create an empty domain");

        self.add_domain(IntegerDomain::from_values(&sorted_values))
    }

    fn add_domain(&mut self, domain: IntegerDomain) -> DomainId {
        let _ = self.deltas.push(Delta::default());
        self.events.grow();
        self.domains.push(domain)
    }

    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub fn get_lower_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].lower_bound()
    }

    pub fn get_upper_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].upper_bound()
    }

    pub fn get_size(&self, domain: DomainId) -> u64 {
        self.domains[domain].size()
    }

    pub fn is_domain_assigned(&self, domain: DomainId) -> bool {
        self.domains[domain].is_fixed()
    }

    pub fn get_assigned_value(&self, domain: DomainId) -> Option<i32> {
        let integer_domain = &self.domains[domain];
        integer_domain
            .is_fixed()
            .then(|| integer_domain.lower_bound())
    }

    pub fn is_value_in_domain(&self, domain: DomainId, value: i32) -> bool {
        self.domains[domain].contains(value)
    }

    pub fn get_domain_kind(&self, domain: DomainId) -> DomainKind {
        self.domains[domain].kind()
    }

    pub fn next_value(&self, domain: DomainId, value: i32) -> Option<i32> {
        self.domains[domain].next_value(value)
    }

    pub fn previous_value(&self, domain: DomainId, value: i32) -> Option<i32> {
        self.domains[domain].previous_value(value)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn delta_entries(&self, domain: DomainId) -> &[DeltaEntry] {
        self.deltas[domain].entries(self.epoch)
    }

    pub(crate) fn num_mutations(&self) -> u64 {
        self.num_mutations
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
        self.epoch += 1;
    }

    /// Undo every change made after `checkpoint`. Pending events refer to the undone state and
    /// are discarded.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        for change in self.trail.synchronise(checkpoint) {
            match change {
                DomainChange::Bounds {
                    domain,
                    lower_bound,
                    upper_bound,
                    size,
                } => self.domains[domain].restore_bounds(lower_bound, upper_bound, size),
                DomainChange::Removal { domain, value } => {
                    self.domains[domain].restore_value(value)
                }
            }
        }

        self.epoch += 1;
        self.events.clear();
    }

    pub(crate) fn drain_domain_events(&mut self) -> impl Iterator<Item = DomainUpdate> + '_ {
        self.events.drain()
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        let upper_bound = self.get_upper_bound(domain);
        self.narrow_bounds(
            domain,
            value,
            upper_bound,
            cause,
            "lower bound above the upper bound",
        )
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.get_lower_bound(domain);
        self.narrow_bounds(
            domain,
            lower_bound,
            value,
            cause,
            "upper bound below the lower bound",
        )
    }

    pub(crate) fn tighten_bounds(
        &mut self,
        domain: DomainId,
        lower_bound: i32,
        upper_bound: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        self.narrow_bounds(
            domain,
            lower_bound,
            upper_bound,
            cause,
            "no value between the new bounds",
        )
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain: DomainId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        if !self.domains[domain].contains(value) {
            return Err(EmptyDomain {
                domain,
                cause,
                reason: "instantiation to a value outside of the domain",
            });
        }

        self.narrow_bounds(
            domain,
            value,
            value,
            cause,
            "instantiation to a value outside of the domain",
        )
    }

    /// Remove `value`. Removing a bound moves that bound to the next present value. Interior
    /// removals from a bounded domain are ignored, since it cannot represent holes.
    pub(crate) fn remove_value(
        &mut self,
        domain: DomainId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        self.remove_interval(domain, value, value, cause)
    }

    /// Remove every value in `[from, to]`.
    pub(crate) fn remove_interval(
        &mut self,
        domain: DomainId,
        from: i32,
        to: i32,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        let integer_domain = &self.domains[domain];
        let lower_bound = integer_domain.lower_bound();
        let upper_bound = integer_domain.upper_bound();

        let from = from.max(lower_bound);
        let to = to.min(upper_bound);
        if from > to {
            return Ok(false);
        }

        if from == lower_bound && to == upper_bound {
            return Err(EmptyDomain {
                domain,
                cause,
                reason: "removed every remaining value",
            });
        }
        if from == lower_bound {
            return self.narrow_bounds(
                domain,
                to + 1,
                upper_bound,
                cause,
                "removed every remaining value",
            );
        }
        if to == upper_bound {
            return self.narrow_bounds(
                domain,
                lower_bound,
                from - 1,
                cause,
                "removed every remaining value",
            );
        }

        if integer_domain.kind() == DomainKind::Bounded {
            debug!(
                "ignoring removal of [{from}, {to}] from the interior of bounded domain {domain}"
            );
            return Ok(false);
        }

        let runs = integer_domain.present_runs(from, to);
        if runs.is_empty() {
            return Ok(false);
        }

        for &(run_from, run_to) in runs.iter() {
            for value in run_from..=run_to {
                self.trail.push(DomainChange::Removal { domain, value });
                self.domains[domain].remove_interior(value);
            }
            self.deltas[domain].record(
                self.epoch,
                DeltaEntry {
                    from: run_from,
                    to: run_to,
                    cause,
                },
            );
        }

        self.events
            .event_occurred(domain, IntEventType::Remove, cause);
        self.num_mutations += 1;

        Ok(true)
    }

    /// Intersect the bounds with `[lower_bound, upper_bound]` and snap them to present values.
    fn narrow_bounds(
        &mut self,
        domain: DomainId,
        lower_bound: i32,
        upper_bound: i32,
        cause: Cause,
        reason: &'static str,
    ) -> Result<bool, EmptyDomain> {
        let integer_domain = &self.domains[domain];
        let old_lower_bound = integer_domain.lower_bound();
        let old_upper_bound = integer_domain.upper_bound();

        let requested_lower_bound = lower_bound.max(old_lower_bound);
        let requested_upper_bound = upper_bound.min(old_upper_bound);
        if requested_lower_bound == old_lower_bound && requested_upper_bound == old_upper_bound {
            return Ok(false);
        }

        let new_lower_bound =
            integer_domain.first_present_in(requested_lower_bound, requested_upper_bound);
        let new_upper_bound =
            integer_domain.last_present_in(requested_lower_bound, requested_upper_bound);
        let (Some(new_lower_bound), Some(new_upper_bound)) = (new_lower_bound, new_upper_bound)
        else {
            return Err(EmptyDomain {
                domain,
                cause,
                reason,
            });
        };

        let mut removed = Vec::new();
        if new_lower_bound > old_lower_bound {
            removed.extend(integer_domain.present_runs(old_lower_bound, new_lower_bound - 1));
        }
        if new_upper_bound < old_upper_bound {
            removed.extend(integer_domain.present_runs(new_upper_bound + 1, old_upper_bound));
        }
        for (from, to) in removed {
            self.deltas[domain].record(self.epoch, DeltaEntry { from, to, cause });
        }

        self.trail.push(DomainChange::Bounds {
            domain,
            lower_bound: old_lower_bound,
            upper_bound: old_upper_bound,
            size: integer_domain.size(),
        });
        self.domains[domain].set_bounds(new_lower_bound, new_upper_bound);

        let event = IntEventType::classify(
            new_lower_bound != old_lower_bound,
            new_upper_bound != old_upper_bound,
            new_lower_bound == new_upper_bound,
        );
        self.events.event_occurred(domain, event, cause);
        self.num_mutations += 1;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;
    use enumset::EnumSet;

    use super::*;
    use crate::engine::notifications::DomainEvent;

    fn drained_events(assignments: &mut Assignments) -> Vec<DomainUpdate> {
        assignments.drain_domain_events().collect()
    }

    #[test]
    fn removing_the_lower_bound_is_a_lower_bound_event() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(1, 10);

        assert_eq!(Ok(true), assignments.remove_value(x, 1, Cause::Decision));

        assert_eq!(2, assignments.get_lower_bound(x));
        let updates = drained_events(&mut assignments);
        assert_eq!(IntEventType::IncLow.conditions(), updates[0].events);
    }

    #[test]
    fn removing_a_bound_cascades_over_holes() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_from_values(&[1, 2, 5, 7]);

        let _ = assignments.remove_value(x, 2, Cause::Decision).unwrap();
        let _ = assignments.remove_value(x, 1, Cause::Decision).unwrap();

        assert_eq!(5, assignments.get_lower_bound(x));
        assert_eq!(2, assignments.get_size(x));
    }

    #[test]
    fn interior_removal_punches_a_hole() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(1, 10);

        assert_eq!(Ok(true), assignments.remove_value(x, 5, Cause::Decision));
        assert_eq!(Ok(false), assignments.remove_value(x, 5, Cause::Decision));

        assert!(!assignments.is_value_in_domain(x, 5));
        assert_eq!(9, assignments.get_size(x));
        let updates = drained_events(&mut assignments);
        assert_eq!(enum_set!(DomainEvent::Removal), updates[0].events);
    }

    #[test]
    fn interior_removal_from_a_bounded_domain_is_ignored() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(1, 10);

        assert_eq!(Ok(false), assignments.remove_value(x, 5, Cause::Decision));

        assert!(assignments.is_value_in_domain(x, 5));
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn removing_values_outside_the_domain_is_a_no_op() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(1, 10);

        assert_eq!(Ok(false), assignments.remove_value(x, 0, Cause::Decision));
        assert_eq!(Ok(false), assignments.remove_value(x, 11, Cause::Decision));
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn bound_updates_only_tighten() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);

        assert_eq!(Ok(false), assignments.tighten_lower_bound(x, -5, Cause::Decision));
        assert_eq!(Ok(true), assignments.tighten_upper_bound(x, 8, Cause::Decision));
        assert_eq!(Ok(false), assignments.tighten_upper_bound(x, 9, Cause::Decision));

        assert_eq!(8, assignments.get_upper_bound(x));
    }

    #[test]
    fn crossing_bounds_is_a_contradiction_and_leaves_the_domain_intact() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);

        let result = assignments.tighten_lower_bound(x, 11, Cause::Decision);

        assert_eq!(
            Err(EmptyDomain {
                domain: x,
                cause: Cause::Decision,
                reason: "lower bound above the upper bound",
            }),
            result
        );
        assert_eq!(0, assignments.get_lower_bound(x));
        assert_eq!(10, assignments.get_upper_bound(x));
    }

    #[test]
    fn instantiating_outside_the_domain_fails() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_from_values(&[1, 3]);

        assert!(assignments.make_assignment(x, 2, Cause::Decision).is_err());
        assert_eq!(Ok(true), assignments.make_assignment(x, 3, Cause::Decision));
        assert_eq!(Some(3), assignments.get_assigned_value(x));

        let updates = drained_events(&mut assignments);
        assert_eq!(EnumSet::all(), updates[0].events);
    }

    #[test]
    fn moving_both_bounds_is_a_bound_event() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);

        let _ = assignments.tighten_bounds(x, 2, 8, Cause::Decision).unwrap();

        let updates = drained_events(&mut assignments);
        assert_eq!(IntEventType::Bound.conditions(), updates[0].events);
    }

    #[test]
    fn removing_an_interval_touching_a_bound_moves_the_bound() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);

        let _ = assignments.remove_interval(x, -3, 4, Cause::Decision).unwrap();

        assert_eq!(5, assignments.get_lower_bound(x));
        assert_eq!(
            Err(EmptyDomain {
                domain: x,
                cause: Cause::Decision,
                reason: "removed every remaining value",
            }),
            assignments.remove_interval(x, 0, 20, Cause::Decision)
        );
    }

    #[test]
    fn removing_the_last_value_fails() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(4, 4);

        assert!(assignments.remove_value(x, 4, Cause::Decision).is_err());
        assert_eq!(Some(4), assignments.get_assigned_value(x));
    }

    #[test]
    fn synchronise_restores_bounds_and_holes() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 10);

        assignments.new_checkpoint();
        let _ = assignments.remove_value(x, 5, Cause::Decision).unwrap();
        let _ = assignments.tighten_lower_bound(x, 3, Cause::Decision).unwrap();
        assignments.new_checkpoint();
        let _ = assignments.make_assignment(x, 7, Cause::Decision).unwrap();

        assignments.synchronise(1);
        assert_eq!(3, assignments.get_lower_bound(x));
        assert_eq!(10, assignments.get_upper_bound(x));
        assert_eq!(7, assignments.get_size(x));

        assignments.synchronise(0);
        assert!(assignments.is_value_in_domain(x, 5));
        assert_eq!(11, assignments.get_size(x));
        assert!(!assignments.has_pending_events());
    }
}
