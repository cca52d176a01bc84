use std::ops::Not;

use enumset::EnumSet;

use super::DomainId;
use super::IntView;
use super::IntegerVariable;
use super::Transform;
use crate::basic_types::Cause;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::marrow_assert_simple;

/// A 0/1 integer variable read as a truth value.
pub trait BooleanVariable: IntegerVariable + Not {
    /// `Some(true)` if the variable is fixed to 1, `Some(false)` if fixed to 0.
    fn boolean_value(&self, assignments: &Assignments) -> Option<bool> {
        self.fixed_value(assignments).map(|value| value == 1)
    }

    fn set_to_true(
        &self,
        assignments: &mut Assignments,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        self.instantiate(assignments, 1, cause)
    }

    fn set_to_false(
        &self,
        assignments: &mut Assignments,
        cause: Cause,
    ) -> Result<bool, EmptyDomain> {
        self.instantiate(assignments, 0, cause)
    }
}

/// Forwards a function implementation to the field on self.
macro_rules! forward {
    (
        $field:ident,
        fn $name:ident(
            &self
            $(, $param_name:ident : $param_type:ty)*
        ) $(-> $return_type:ty)?
    ) => {
        fn $name(&self $(, $param_name: $param_type)*) $(-> $return_type)? {
            self.$field.$name($($param_name),*)
        }
    };
}

macro_rules! forward_integer_variable {
    ($field:ident) => {
        forward!($field, fn domain_id(&self) -> DomainId);
        forward!($field, fn lower_bound(&self, assignments: &Assignments) -> i32);
        forward!($field, fn upper_bound(&self, assignments: &Assignments) -> i32);
        forward!($field, fn contains(&self, assignments: &Assignments, value: i32) -> bool);
        forward!(
            $field,
            fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32>
        );
        forward!(
            $field,
            fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32>
        );
        forward!(
            $field,
            fn remove(
                &self,
                assignments: &mut Assignments,
                value: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn remove_interval(
                &self,
                assignments: &mut Assignments,
                from: i32,
                to: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn set_lower_bound(
                &self,
                assignments: &mut Assignments,
                value: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn set_upper_bound(
                &self,
                assignments: &mut Assignments,
                value: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn update_bounds(
                &self,
                assignments: &mut Assignments,
                lower_bound: i32,
                upper_bound: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn instantiate(
                &self,
                assignments: &mut Assignments,
                value: i32,
                cause: Cause
            ) -> Result<bool, EmptyDomain>
        );
        forward!(
            $field,
            fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>)
        );
        forward!($field, fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent);
        forward!($field, fn unpack_removed_value(&self, value: i32) -> i32);
    };
}

/// A domain restricted to {0, 1}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoolVar {
    domain: DomainId,
}

impl BoolVar {
    /// Wrap a domain whose values are within {0, 1}.
    pub fn new(domain: DomainId, assignments: &Assignments) -> BoolVar {
        marrow_assert_simple!(
            assignments.get_lower_bound(domain) >= 0 && assignments.get_upper_bound(domain) <= 1,
            "a boolean variable needs a domain within {{0, 1}}, {domain} is not"
        );

        BoolVar { domain }
    }
}

impl IntegerVariable for BoolVar {
    forward_integer_variable!(domain);
}

impl BooleanVariable for BoolVar {}

impl Not for BoolVar {
    type Output = BoolView<BoolVar>;

    fn not(self) -> BoolView<BoolVar> {
        BoolView {
            view: IntView::new(self, Transform::BoolNot),
        }
    }
}

/// A boolean handle onto another boolean variable, either the variable itself or its complement.
///
/// The complement of a complement is the variable again, so negating a view never stacks
/// transforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoolView<Var> {
    view: IntView<Var>,
}

impl<Var: BooleanVariable> BoolView<Var> {
    /// A view equal to `var`.
    pub fn new(var: Var) -> BoolView<Var> {
        BoolView {
            view: IntView::new(var, Transform::Identity),
        }
    }

    pub fn is_complement(&self) -> bool {
        self.view.transform() == Transform::BoolNot
    }
}

impl<Var: BooleanVariable> IntegerVariable for BoolView<Var> {
    forward_integer_variable!(view);
}

impl<Var: BooleanVariable> BooleanVariable for BoolView<Var> {}

impl<Var: BooleanVariable> Not for BoolView<Var> {
    type Output = BoolView<Var>;

    fn not(self) -> BoolView<Var> {
        let transform = if self.is_complement() {
            Transform::Identity
        } else {
            Transform::BoolNot
        };

        BoolView {
            view: IntView::new(self.view.base().clone(), transform),
        }
    }
}
