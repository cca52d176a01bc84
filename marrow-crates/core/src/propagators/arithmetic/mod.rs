pub mod binary;
mod linear_less_or_equal;

pub use binary::*;
pub use linear_less_or_equal::*;
