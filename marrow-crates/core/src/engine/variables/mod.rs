//! A variable, in the context of the solver, is a view onto a domain. It may forward domain
//! information unaltered, or apply a transformation which can be performed without the need of
//! an extra domain and a linking constraint.
//!
//! [`DomainId`] is the variable which owns a domain. [`IntView`] applies one of the
//! [`Transform`]s to another variable; [`BoolVar`] and [`BoolView`] add truth-value operations
//! on 0/1 domains; [`RealView`] exposes the continuous relaxation of an integer variable.

mod boolean;
mod domain_id;
mod domain_values;
mod int_view;
mod integer_variable;
mod real_view;
mod transform;
mod transformable_variable;

pub use boolean::BoolVar;
pub use boolean::BoolView;
pub use boolean::BooleanVariable;
pub use domain_id::DomainId;
pub use domain_values::DomainValues;
pub use int_view::IntView;
pub use integer_variable::IntegerVariable;
pub use real_view::RealView;
pub use transform::Transform;
pub use transformable_variable::TransformableVariable;
