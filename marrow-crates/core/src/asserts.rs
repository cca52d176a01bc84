//! Assertions with a configurable level of thoroughness.
//!
//! Simple assertions are always checked. The more expensive levels are only compiled in when the
//! `debug-checks` feature is enabled, since they may walk entire domains or watch lists.

#[cfg(not(feature = "debug-checks"))]
pub const MARROW_ASSERT_LEVEL_DEFINITION: u8 = MARROW_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const MARROW_ASSERT_LEVEL_DEFINITION: u8 = MARROW_ASSERT_EXTREME;

pub const MARROW_ASSERT_SIMPLE: u8 = 1;
pub const MARROW_ASSERT_MODERATE: u8 = 2;
pub const MARROW_ASSERT_ADVANCED: u8 = 3;
pub const MARROW_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::MARROW_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MARROW_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::MARROW_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MARROW_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::MARROW_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MARROW_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::MARROW_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MARROW_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::MARROW_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MARROW_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
