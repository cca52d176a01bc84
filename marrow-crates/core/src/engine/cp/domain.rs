use crate::marrow_assert_moderate;

/// How a domain stores its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainKind {
    /// An interval `[lb, ub]`; values strictly between the bounds cannot be removed.
    Bounded,
    /// An explicit set of values which may contain holes.
    Enumerated,
}

/// The values of one integer variable.
///
/// The bounds are always cached. Enumerated domains additionally keep a membership table over the
/// initial span of the domain; an entry is only meaningful while it lies within the bounds.
#[derive(Clone, Debug)]
pub(crate) struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    size: u64,
    values: Option<ValueSet>,
}

#[derive(Clone, Debug)]
struct ValueSet {
    offset: i32,
    present: Vec<bool>,
}

impl ValueSet {
    fn slot(&self, value: i32) -> usize {
        (i64::from(value) - i64::from(self.offset)) as usize
    }

    fn contains(&self, value: i32) -> bool {
        self.present[self.slot(value)]
    }

    fn set(&mut self, value: i32, is_present: bool) {
        let slot = self.slot(value);
        self.present[slot] = is_present;
    }
}

impl IntegerDomain {
    pub(crate) fn bounded(lower_bound: i32, upper_bound: i32) -> Self {
        IntegerDomain {
            lower_bound,
            upper_bound,
            size: span(lower_bound, upper_bound),
            values: None,
        }
    }

    pub(crate) fn enumerated(lower_bound: i32, upper_bound: i32) -> Self {
        let size = span(lower_bound, upper_bound);
        IntegerDomain {
            lower_bound,
            upper_bound,
            size,
            values: Some(ValueSet {
                offset: lower_bound,
                present: vec![true; size as usize],
            }),
        }
    }

    /// An enumerated domain holding exactly the given values. `sorted_values` must be sorted,
    /// deduplicated and non-empty.
    pub(crate) fn from_values(sorted_values: &[i32]) -> Self {
        let lower_bound = sorted_values[0];
        let upper_bound = sorted_values[sorted_values.len() - 1];

        let mut value_set = ValueSet {
            offset: lower_bound,
            present: vec![false; span(lower_bound, upper_bound) as usize],
        };
        for &value in sorted_values {
            value_set.set(value, true);
        }

        IntegerDomain {
            lower_bound,
            upper_bound,
            size: sorted_values.len() as u64,
            values: Some(value_set),
        }
    }

    pub(crate) fn kind(&self) -> DomainKind {
        if self.values.is_some() {
            DomainKind::Enumerated
        } else {
            DomainKind::Bounded
        }
    }

    pub(crate) fn lower_bound(&self) -> i32 {
        self.lower_bound
    }

    pub(crate) fn upper_bound(&self) -> i32 {
        self.upper_bound
    }

    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }

    pub(crate) fn contains(&self, value: i32) -> bool {
        if value < self.lower_bound || value > self.upper_bound {
            return false;
        }

        self.values
            .as_ref()
            .map_or(true, |value_set| value_set.contains(value))
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    pub(crate) fn next_value(&self, value: i32) -> Option<i32> {
        if value < self.lower_bound {
            return Some(self.lower_bound);
        }
        if value >= self.upper_bound {
            return None;
        }

        self.first_present_in(value + 1, self.upper_bound)
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub(crate) fn previous_value(&self, value: i32) -> Option<i32> {
        if value > self.upper_bound {
            return Some(self.upper_bound);
        }
        if value <= self.lower_bound {
            return None;
        }

        self.last_present_in(self.lower_bound, value - 1)
    }

    /// The smallest value in `[from, to]` which has not been removed, ignoring the bounds.
    pub(crate) fn first_present_in(&self, from: i32, to: i32) -> Option<i32> {
        if from > to {
            return None;
        }
        match &self.values {
            None => Some(from),
            Some(value_set) => (from..=to).find(|&value| value_set.contains(value)),
        }
    }

    /// The largest value in `[from, to]` which has not been removed, ignoring the bounds.
    pub(crate) fn last_present_in(&self, from: i32, to: i32) -> Option<i32> {
        if from > to {
            return None;
        }
        match &self.values {
            None => Some(to),
            Some(value_set) => (from..=to).rev().find(|&value| value_set.contains(value)),
        }
    }

    /// The maximal runs of values in `[from, to]` that are still present, as inclusive ranges.
    pub(crate) fn present_runs(&self, from: i32, to: i32) -> Vec<(i32, i32)> {
        let Some(value_set) = &self.values else {
            return if from <= to { vec![(from, to)] } else { vec![] };
        };

        let mut runs = Vec::new();
        let mut run_start = None;
        for value in from..=to {
            match (value_set.contains(value), run_start) {
                (true, None) => run_start = Some(value),
                (false, Some(start)) => {
                    runs.push((start, value - 1));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push((start, to));
        }

        runs
    }

    /// Narrow the bounds to `[lower_bound, upper_bound]`, which must be present values within the
    /// current bounds.
    pub(crate) fn set_bounds(&mut self, lower_bound: i32, upper_bound: i32) {
        marrow_assert_moderate!(self.contains(lower_bound) && self.contains(upper_bound));

        let removed_below = if lower_bound > self.lower_bound {
            self.count_present(self.lower_bound, lower_bound - 1)
        } else {
            0
        };
        let removed_above = if upper_bound < self.upper_bound {
            self.count_present(upper_bound + 1, self.upper_bound)
        } else {
            0
        };

        self.size -= removed_below + removed_above;
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
    }

    /// Punch a hole at `value`, which must be a present value strictly between the bounds of an
    /// enumerated domain.
    pub(crate) fn remove_interior(&mut self, value: i32) {
        marrow_assert_moderate!(self.lower_bound < value && value < self.upper_bound);

        if let Some(value_set) = &mut self.values {
            value_set.set(value, false);
            self.size -= 1;
        }
    }

    pub(crate) fn restore_bounds(&mut self, lower_bound: i32, upper_bound: i32, size: u64) {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self.size = size;
    }

    pub(crate) fn restore_value(&mut self, value: i32) {
        if let Some(value_set) = &mut self.values {
            value_set.set(value, true);
            self.size += 1;
        }
    }

    fn count_present(&self, from: i32, to: i32) -> u64 {
        match &self.values {
            None => span(from, to),
            Some(value_set) => (from..=to)
                .filter(|&value| value_set.contains(value))
                .count() as u64,
        }
    }
}

fn span(lower_bound: i32, upper_bound: i32) -> u64 {
    (i64::from(upper_bound) - i64::from(lower_bound) + 1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerated_domain_from_values_has_holes() {
        let domain = IntegerDomain::from_values(&[1, 3, 4, 8]);

        assert_eq!(DomainKind::Enumerated, domain.kind());
        assert_eq!(4, domain.size());
        assert!(!domain.contains(2));
        assert_eq!(Some(8), domain.next_value(4));
        assert_eq!(Some(1), domain.previous_value(3));
        assert_eq!(None, domain.previous_value(1));
    }

    #[test]
    fn bounded_domain_navigation_is_arithmetic() {
        let domain = IntegerDomain::bounded(-2, 2);

        assert_eq!(5, domain.size());
        assert_eq!(Some(-2), domain.next_value(-10));
        assert_eq!(Some(1), domain.next_value(0));
        assert_eq!(None, domain.next_value(2));
        assert_eq!(Some(2), domain.previous_value(7));
    }

    #[test]
    fn present_runs_skip_holes() {
        let domain = IntegerDomain::from_values(&[0, 1, 2, 5, 6, 9]);

        assert_eq!(vec![(0, 2), (5, 6)], domain.present_runs(0, 8));
        assert_eq!(vec![(9, 9)], domain.present_runs(7, 9));
    }

    #[test]
    fn narrowing_bounds_updates_the_size() {
        let mut domain = IntegerDomain::from_values(&[0, 2, 4, 6]);

        domain.set_bounds(2, 4);

        assert_eq!(2, domain.size());
        assert!(!domain.contains(0));
        assert!(domain.contains(4));
    }
}
