mod binary_equals;
mod binary_not_equals;

pub use binary_equals::*;
pub use binary_not_equals::*;
