use std::iter::Rev;
use std::vec::Drain;

use crate::marrow_assert_simple;

/// A stack of undo entries partitioned by checkpoints.
///
/// Every reversible structure in the engine (domains, trailed integers, passive propagators)
/// pushes the information it needs to undo a change onto its own [`Trail`]. Restoring to a
/// checkpoint hands back the entries above it, newest first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the length of the trail when checkpoint i + 1 was created.
    checkpoint_delimiters: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T` does not need to implement `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            checkpoint_delimiters: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.checkpoint_delimiters.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// Drop back to `checkpoint`, returning the removed entries in reverse order of insertion.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        marrow_assert_simple!(checkpoint < self.current_checkpoint);

        let new_len = self.checkpoint_delimiters[checkpoint];

        self.current_checkpoint = checkpoint;
        self.checkpoint_delimiters.truncate(checkpoint);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
