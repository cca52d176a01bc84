pub(crate) mod cp;
pub mod notifications;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
mod variable_names;
pub mod variables;

pub use cp::Assignments;
pub use cp::DeltaMonitor;
pub use cp::DomainKind;
pub use cp::EmptyDomain;
pub(crate) use cp::PropagatorQueue;
pub use cp::TrailedInteger;
pub use cp::TrailedValues;
pub use state::Conflict;
pub use state::EngineStatus;
pub use state::State;
pub use state::StateOptions;
pub(crate) use variable_names::VariableNames;
