use super::IntegerVariable;
use crate::engine::Assignments;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    Start,
    At(i32),
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// A lazy walk over the values of a variable, in either direction.
///
/// Each step asks the variable for the next (or previous) value, so no values are materialised.
/// The walk can be restarted with [`DomainValues::reset`].
#[derive(Debug)]
pub struct DomainValues<'a, Var> {
    var: &'a Var,
    assignments: &'a Assignments,
    direction: Direction,
    cursor: Cursor,
}

impl<'a, Var: IntegerVariable> DomainValues<'a, Var> {
    /// Walk from the lower bound upwards.
    pub fn ascending(var: &'a Var, assignments: &'a Assignments) -> Self {
        DomainValues {
            var,
            assignments,
            direction: Direction::Ascending,
            cursor: Cursor::Start,
        }
    }

    /// Walk from the upper bound downwards.
    pub fn descending(var: &'a Var, assignments: &'a Assignments) -> Self {
        DomainValues {
            var,
            assignments,
            direction: Direction::Descending,
            cursor: Cursor::Start,
        }
    }

    /// Restart the walk from the first value.
    pub fn reset(&mut self) {
        self.cursor = Cursor::Start;
    }
}

impl<Var: IntegerVariable> Iterator for DomainValues<'_, Var> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let next = match (self.cursor, self.direction) {
            (Cursor::Exhausted, _) => None,
            (Cursor::Start, Direction::Ascending) => Some(self.var.lower_bound(self.assignments)),
            (Cursor::Start, Direction::Descending) => Some(self.var.upper_bound(self.assignments)),
            (Cursor::At(value), Direction::Ascending) => {
                self.var.next_value(self.assignments, value)
            }
            (Cursor::At(value), Direction::Descending) => {
                self.var.previous_value(self.assignments, value)
            }
        };

        self.cursor = next.map_or(Cursor::Exhausted, Cursor::At);
        next
    }
}
