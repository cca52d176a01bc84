use super::IntView;
use super::IntegerVariable;
use super::Transform;

/// Derive views from a variable without creating new domains.
///
/// Scaling leaves holes in the domain of the view. E.g. if `dom(x) = {1, 2}`, then
/// `dom(x.scaled(2)) = {2, 4}` and *not* `{2, 3, 4}`.
pub trait TransformableVariable: IntegerVariable {
    /// The view `-self`.
    fn negated(&self) -> IntView<Self> {
        IntView::new(self.clone(), Transform::Negation)
    }

    /// The view `factor * self`; the factor has to be strictly positive, use
    /// [`TransformableVariable::negated`] for the sign.
    fn scaled(&self, factor: i32) -> IntView<Self> {
        IntView::new(self.clone(), Transform::Scale(factor))
    }

    /// The view `self + offset`.
    fn offset(&self, offset: i32) -> IntView<Self> {
        IntView::new(self.clone(), Transform::Offset(offset))
    }

    /// A second handle onto the same domain.
    fn alias(&self) -> IntView<Self> {
        IntView::new(self.clone(), Transform::Identity)
    }
}

impl<Var: IntegerVariable> TransformableVariable for Var {}
