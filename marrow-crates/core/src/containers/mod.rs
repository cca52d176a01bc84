//! Containers indexed by strongly typed keys.
mod keyed_vec;

use fnv::FnvBuildHasher;
pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;

/// [`std::collections::HashMap`] that defaults to a deterministic hasher.
pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
