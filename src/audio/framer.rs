use std::collections::VecDeque;

use crate::error::{Result, ScopeError};

/// Re-frames capture blocks of any size into exact `chunk_size` chunks.
///
/// Holds at most `chunk_size * multiplier` pending samples; samples that do
/// not fit are dropped and counted.
pub struct ChunkFramer {
    pending: VecDeque<f32>,
    chunk_size: usize,
    capacity: usize,
    dropped: u64,
}

impl ChunkFramer {
    pub fn new(chunk_size: usize, multiplier: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ScopeError::Config("chunk size must be > 0".into()));
        }
        let capacity = chunk_size * multiplier.max(1);
        Ok(Self {
            pending: VecDeque::with_capacity(capacity),
            chunk_size,
            capacity,
            dropped: 0,
        })
    }

    /// Queue a capture block; returns how many samples were accepted.
    pub fn push(&mut self, block: &[f32]) -> usize {
        let free = self.capacity - self.pending.len();
        let accepted = block.len().min(free);
        self.pending.extend(&block[..accepted]);

        let lost = block.len() - accepted;
        if lost > 0 {
            self.dropped += lost as u64;
            log::warn!("Framer full, dropped {} samples ({} total)", lost, self.dropped);
        }
        accepted
    }

    /// Next full chunk, if enough samples are pending.
    pub fn next_chunk(&mut self) -> Option<Vec<f32>> {
        if self.pending.len() < self.chunk_size {
            return None;
        }
        Some(self.pending.drain(..self.chunk_size).collect())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reframes_uneven_blocks() {
        let mut framer = ChunkFramer::new(4, 3).unwrap();
        assert_eq!(framer.push(&[1.0, 2.0, 3.0]), 3);
        assert!(framer.next_chunk().is_none());

        framer.push(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(framer.next_chunk(), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(framer.next_chunk(), Some(vec![5.0, 6.0, 7.0, 8.0]));
        assert!(framer.next_chunk().is_none());
        assert_eq!(framer.pending(), 1);
    }

    #[test]
    fn drops_samples_beyond_capacity() {
        let mut framer = ChunkFramer::new(2, 2).unwrap();
        assert_eq!(framer.capacity(), 4);
        assert_eq!(framer.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 4);
        assert_eq!(framer.dropped(), 2);

        assert_eq!(framer.next_chunk(), Some(vec![1.0, 2.0]));
        assert_eq!(framer.push(&[7.0]), 1);
        assert_eq!(framer.next_chunk(), Some(vec![3.0, 4.0]));
        assert!(framer.next_chunk().is_none());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        assert!(matches!(ChunkFramer::new(0, 3), Err(ScopeError::Config(_))));
    }
}
