use thiserror::Error;

#[cfg(doc)]
use crate::engine::State;

/// Errors related to posting propagators on the [`State`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Posting a propagator was attempted while the root of the [`State`] is already infeasible.
    #[error("Posting the propagator failed because the state is infeasible at the root")]
    InfeasibleState,
    /// Propagating the new propagator at the root emptied a domain; the problem has no solution.
    #[error("Posting the propagator failed because it is infeasible at the root")]
    InfeasiblePropagator,
}
