use enumset::EnumSet;

use crate::engine::notifications::DomainEvent;
use crate::math::num_ext::NumExt;

/// The bijections a view can apply to the values of the variable it wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    /// `v`
    Identity,
    /// `-v`
    Negation,
    /// `c * v` for a strictly positive `c`.
    Scale(i32),
    /// `v + c`
    Offset(i32),
    /// `1 - v`, on a 0/1 variable.
    BoolNot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rounding {
    Up,
    Down,
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl Transform {
    /// Map a value of the wrapped variable to a value of the view. Images beyond the range of
    /// `i32` saturate.
    pub fn apply(self, value: i32) -> i32 {
        let value = i64::from(value);
        let image = match self {
            Transform::Identity => value,
            Transform::Negation => -value,
            Transform::Scale(factor) => i64::from(factor) * value,
            Transform::Offset(offset) => value + i64::from(offset),
            Transform::BoolNot => 1 - value,
        };

        saturate(image)
    }

    /// Map a value of the view back to the wrapped variable. Only a scale can produce a value
    /// between two images, which is rounded in the given direction.
    ///
    /// Results beyond the range of `i32` saturate, which is exact for bounds since every value of
    /// the wrapped variable is an `i32`.
    pub(crate) fn invert(self, value: i32, rounding: Rounding) -> i32 {
        let inverted = match self {
            Transform::Identity => i64::from(value),
            Transform::Negation => -i64::from(value),
            Transform::Scale(factor) => i64::from(match rounding {
                Rounding::Up => value.ceil_div(factor),
                Rounding::Down => value.floor_div(factor),
            }),
            Transform::Offset(offset) => i64::from(value) - i64::from(offset),
            Transform::BoolNot => 1 - i64::from(value),
        };

        saturate(inverted)
    }

    /// The value of the wrapped variable whose image is `value`, if there is one.
    pub fn invert_exact(self, value: i32) -> Option<i32> {
        match self {
            Transform::Identity => Some(value),
            Transform::Negation => value.checked_neg(),
            Transform::Scale(factor) => (value % factor == 0).then(|| value / factor),
            Transform::Offset(offset) => value.checked_sub(offset),
            Transform::BoolNot => 1_i32.checked_sub(value),
        }
    }

    /// Whether the transform reverses the order of values, which swaps the roles of the bounds.
    pub fn is_decreasing(self) -> bool {
        matches!(self, Transform::Negation | Transform::BoolNot)
    }

    pub(crate) fn translate_event(self, event: DomainEvent) -> DomainEvent {
        if !self.is_decreasing() {
            return event;
        }

        match event {
            DomainEvent::LowerBound => DomainEvent::UpperBound,
            DomainEvent::UpperBound => DomainEvent::LowerBound,
            event => event,
        }
    }

    pub(crate) fn translate_events(self, events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent> {
        events
            .iter()
            .map(|event| self.translate_event(event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_inversion_rounds_in_the_requested_direction() {
        let transform = Transform::Scale(3);

        assert_eq!(2, transform.invert(4, Rounding::Up));
        assert_eq!(1, transform.invert(4, Rounding::Down));
        assert_eq!(-1, transform.invert(-4, Rounding::Up));
        assert_eq!(-2, transform.invert(-4, Rounding::Down));
    }

    #[test]
    fn only_multiples_invert_exactly_through_a_scale() {
        let transform = Transform::Scale(3);

        assert_eq!(Some(-2), transform.invert_exact(-6));
        assert_eq!(None, transform.invert_exact(4));
        assert_eq!(Some(-7), Transform::Offset(2).invert_exact(-5));
        assert_eq!(Some(0), Transform::BoolNot.invert_exact(1));
    }

    #[test]
    fn images_outside_of_the_i32_range_saturate() {
        assert_eq!(i32::MAX, Transform::Scale(2).apply(i32::MAX));
        assert_eq!(i32::MIN, Transform::Scale(3).apply(i32::MIN / 2));
        assert_eq!(i32::MAX, Transform::Negation.apply(i32::MIN));
        assert_eq!(i32::MIN, Transform::Offset(10).invert(i32::MIN + 3, Rounding::Down));
        assert_eq!(i32::MAX, Transform::Offset(-1).invert(i32::MAX, Rounding::Up));

        assert_eq!(None, Transform::Negation.invert_exact(i32::MIN));
        assert_eq!(None, Transform::Offset(-1).invert_exact(i32::MAX));
    }

    #[test]
    fn decreasing_transforms_swap_bound_events() {
        let events = DomainEvent::LowerBound | DomainEvent::Removal;

        assert_eq!(
            DomainEvent::UpperBound | DomainEvent::Removal,
            Transform::Negation.translate_events(events)
        );
        assert_eq!(events, Transform::Scale(5).translate_events(events));
        assert_eq!(
            DomainEvent::Assign,
            Transform::BoolNot.translate_event(DomainEvent::Assign)
        );
    }
}
