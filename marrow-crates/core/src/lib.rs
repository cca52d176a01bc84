//! # Marrow
//! The propagation core of a constraint programming solver: integer domains, views over them,
//! propagators, and the engine which runs propagators to a fixed point.
//!
//! A [`State`] owns the domains and the propagators. Variables are created through the
//! [`State`]; views such as `-x`, `2x` or `x + 5` are derived from them through
//! [`variables::TransformableVariable`] and behave like variables without allocating a domain.
//! Constraints are added by posting a [`propagation::PropagatorConstructor`], and the search
//! which drives the [`State`] is responsible for creating checkpoints and restoring them when
//! propagation reports a conflict.
//!
//! # Example
//! ```rust
//! # use marrow_core::propagators::LinearLessOrEqualPropagatorArgs;
//! # use marrow_core::variables::TransformableVariable;
//! # use marrow_core::State;
//! let mut state = State::default();
//! let x = state.new_domain(0, 10, Some("x"));
//! let y = state.new_domain(0, 10, Some("y"));
//!
//! // x - y <= -2
//! let _ = state
//!     .post(LinearLessOrEqualPropagatorArgs {
//!         x: [x.alias(), y.negated()].into(),
//!         c: -2,
//!     })
//!     .expect("the constraint is satisfiable");
//! assert_eq!(state.upper_bound(x), 8);
//! assert_eq!(state.lower_bound(y), 2);
//!
//! state.new_checkpoint();
//! let _ = state.set_lower_bound(x, 5).expect("5 is in the domain of x");
//! state.propagate_to_fixed_point().expect("no conflict");
//! assert_eq!(state.lower_bound(y), 7);
//!
//! state.restore_to(0);
//! assert_eq!(state.lower_bound(y), 2);
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub(crate) mod math;
pub mod propagation;
pub mod propagators;
pub mod statistics;

#[doc(hidden)]
pub mod asserts;

pub use convert_case;

pub use crate::basic_types::Cause;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::variables;
pub use crate::engine::Conflict;
pub use crate::engine::EmptyDomain;
pub use crate::engine::EngineStatus;
pub use crate::engine::State;
pub use crate::engine::StateOptions;
