//! Contains the main building blocks for propagators.
//!
//! # Background
//!
//! A propagator is a filtering algorithm over a fixed tuple of variables. Given the current
//! domains `D` it computes domains `D'` with <code>D'<sub>i</sub> ⊆ D<sub>i</sub></code> for
//! every variable in its scope, removing values which cannot be part of a solution of its
//! constraint. A propagator is at fix-point when applying it again removes nothing.
//!
//! # Practical
//!
//! Each concrete propagator implements [`Propagator`]; the main function is
//! [`Propagator::propagate`], which performs the domain reduction through a
//! [`PropagationContextMut`]. Every mutation made through that context is attributed to the
//! propagator, so that it is not woken up by its own changes.
//!
//! A propagator is created by a [`PropagatorConstructor`]. The constructor registers the
//! propagation conditions of every variable in the scope (the [`DomainEvents`] on which the
//! propagator is enqueued) and sets up its trailed state through the
//! [`PropagatorConstructorContext`].
//!
//! Propagators are not required to be idempotent: the engine calls a propagator again whenever
//! an event it subscribed to happens, until no further changes are made. They may however
//! decline to be enqueued in [`Propagator::notify`], and may report through
//! [`Propagator::is_entailed`] that their constraint can no longer be violated.
//!
//! See the [`crate::propagators`] module for concrete propagator implementations.
mod constructor;
mod contexts;
mod local_id;
mod propagator;

pub(crate) mod propagator_id;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::HasAssignments;
pub use contexts::PropagationContext;
pub use contexts::PropagationContextMut;
pub use contexts::PropagationContextWithTrailedValues;
pub use contexts::ReadDomains;
pub use local_id::LocalId;
pub use propagator::EnqueueDecision;
pub use propagator::EntailmentStatus;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_id::PropagatorVarId;
pub use store::PropagatorHandle;

pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
pub use crate::engine::DeltaMonitor;
pub use crate::engine::TrailedInteger;
