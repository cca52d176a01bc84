use crate::containers::StorageKey;

/// A handle to an integer that is restored automatically when the [`State`] backtracks.
///
/// Propagators keep incremental state (cached sums, counters) in trailed integers so that the
/// state always agrees with the domains it was derived from.
///
/// [`State`]: crate::engine::State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
