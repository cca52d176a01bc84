mod assignments;
mod delta;
mod domain;
mod propagator_queue;
mod trailed;

pub use assignments::Assignments;
pub use assignments::EmptyDomain;
pub use delta::DeltaMonitor;
pub use domain::DomainKind;
pub(crate) use propagator_queue::PropagatorQueue;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
