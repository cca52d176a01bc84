//! Rounded integer division.
//!
//! Scale views divide bounds by their factor; rounding towards zero would make them unsound for
//! negative values, so the rounding direction is always explicit.

pub(crate) trait NumExt {
    /// Division rounding towards positive infinity.
    fn ceil_div(self, other: Self) -> Self;

    /// Division rounding towards negative infinity.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn floor_div(self, other: Self) -> Self;
}

impl NumExt for i32 {
    fn ceil_div(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn floor_div(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other < 0) || (r < 0 && other > 0) {
            d - 1
        } else {
            d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NumExt;

    #[test]
    fn ceil_rounds_up_for_both_signs() {
        assert_eq!(2, 4_i32.ceil_div(3));
        assert_eq!(-1, (-4_i32).ceil_div(3));
        assert_eq!(2, 6_i32.ceil_div(3));
    }

    #[test]
    fn floor_rounds_down_for_both_signs() {
        assert_eq!(1, 4_i32.floor_div(3));
        assert_eq!(-2, (-4_i32).floor_div(3));
        assert_eq!(-2, (-6_i32).floor_div(3));
    }
}
