use crate::basic_types::Cause;
use crate::engine::variables::IntegerVariable;
use crate::propagation::HasAssignments;
use crate::propagation::PropagatorId;

/// An inclusive range of values removed from a domain by a single mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DeltaEntry {
    pub(crate) from: i32,
    pub(crate) to: i32,
    pub(crate) cause: Cause,
}

/// The values removed from one domain during the current epoch.
///
/// The epoch advances whenever a checkpoint is created or restored, which implicitly clears every
/// delta without touching the domains that were not modified since.
#[derive(Clone, Debug, Default)]
pub(crate) struct Delta {
    epoch: u64,
    entries: Vec<DeltaEntry>,
}

impl Delta {
    pub(crate) fn record(&mut self, epoch: u64, entry: DeltaEntry) {
        if self.epoch != epoch {
            self.entries.clear();
            self.epoch = epoch;
        }
        self.entries.push(entry);
    }

    pub(crate) fn entries(&self, epoch: u64) -> &[DeltaEntry] {
        if self.epoch == epoch {
            &self.entries
        } else {
            &[]
        }
    }
}

/// A cursor of one propagator over the removals of one of its variables.
///
/// Incremental propagators use a monitor to process only the values removed since their previous
/// call. Removals made by the owning propagator itself are skipped, and values of views are
/// reported in the coordinates of the view.
#[derive(Clone, Debug)]
pub struct DeltaMonitor<Var> {
    var: Var,
    owner: PropagatorId,
    epoch: u64,
    cursor: usize,
}

impl<Var: IntegerVariable> DeltaMonitor<Var> {
    pub fn new(var: Var, owner: PropagatorId) -> Self {
        DeltaMonitor {
            var,
            owner,
            epoch: 0,
            cursor: 0,
        }
    }

    /// The ranges of values removed from the monitored variable since the previous call, in
    /// removal order.
    ///
    /// Each range is inclusive and given in the coordinates of the monitored variable. For a
    /// scaled view a range also spans the values between the multiples, none of which belong to
    /// the view.
    pub fn take_removed_ranges(&mut self, context: &impl HasAssignments) -> Vec<(i32, i32)> {
        let assignments = context.assignments();
        let epoch = assignments.epoch();
        let entries = assignments.delta_entries(self.var.domain_id());

        if self.epoch != epoch {
            self.epoch = epoch;
            self.cursor = 0;
        }

        let start = self.cursor.min(entries.len());
        self.cursor = entries.len();

        let owner = Cause::Propagator(self.owner);
        entries[start..]
            .iter()
            .filter(|entry| entry.cause != owner)
            .map(|entry| {
                let from = self.var.unpack_removed_value(entry.from);
                let to = self.var.unpack_removed_value(entry.to);
                (from.min(to), from.max(to))
            })
            .collect()
    }

    /// Forget any pending removals, e.g. after the owner recomputed its state from scratch.
    pub fn reset(&mut self, context: &impl HasAssignments) {
        let assignments = context.assignments();
        self.epoch = assignments.epoch();
        self.cursor = assignments.delta_entries(self.var.domain_id()).len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::TransformableVariable;
    use crate::engine::Assignments;

    #[test]
    fn monitor_reports_each_removal_once() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 9);
        let mut monitor = DeltaMonitor::new(x, PropagatorId(0));

        let _ = assignments.remove_value(x, 4, Cause::Decision).unwrap();
        let _ = assignments.tighten_lower_bound(x, 2, Cause::Decision).unwrap();

        assert_eq!(vec![(4, 4), (0, 1)], monitor.take_removed_ranges(&assignments));
        assert!(monitor.take_removed_ranges(&assignments).is_empty());
    }

    #[test]
    fn removals_by_the_owner_are_skipped() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 9);
        let mut monitor = DeltaMonitor::new(x, PropagatorId(7));

        let _ = assignments
            .remove_value(x, 4, Cause::Propagator(PropagatorId(7)))
            .unwrap();
        let _ = assignments
            .remove_value(x, 5, Cause::Propagator(PropagatorId(1)))
            .unwrap();

        assert_eq!(vec![(5, 5)], monitor.take_removed_ranges(&assignments));
    }

    #[test]
    fn view_monitor_translates_values() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 5);
        let mut monitor = DeltaMonitor::new(x.scaled(3).negated(), PropagatorId(0));

        let _ = assignments.remove_value(x, 2, Cause::Decision).unwrap();
        let _ = assignments.tighten_upper_bound(x, 3, Cause::Decision).unwrap();

        assert_eq!(
            vec![(-6, -6), (-15, -12)],
            monitor.take_removed_ranges(&assignments)
        );
    }

    #[test]
    fn a_new_checkpoint_starts_a_new_delta() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(0, 9);
        let mut monitor = DeltaMonitor::new(x, PropagatorId(0));

        let _ = assignments.remove_value(x, 3, Cause::Decision).unwrap();
        assignments.new_checkpoint();
        let _ = assignments.remove_value(x, 6, Cause::Decision).unwrap();

        assert_eq!(vec![(6, 6)], monitor.take_removed_ranges(&assignments));
    }

    #[test]
    fn a_bound_change_is_a_single_range() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 2_000_000);
        let mut monitor = DeltaMonitor::new(x, PropagatorId(0));

        let _ = assignments
            .tighten_lower_bound(x, 1_000_000, Cause::Decision)
            .unwrap();

        assert_eq!(
            vec![(0, 999_999)],
            monitor.take_removed_ranges(&assignments)
        );
    }
}
