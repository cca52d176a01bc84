//! Contains propagator implementations.
//!
//! See [`crate::propagation`] for info on propagators.
pub mod arithmetic;

pub use arithmetic::*;
