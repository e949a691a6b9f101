//! Re-chunking of arbitrary capture buffers into fixed-size blocks.
//!
//! Capture callbacks deliver whatever the driver likes (often 441 or 1024
//! frames).  The voice loop works in fixed blocks so that each blocking read
//! is bounded by one block duration (`block_size / 16 000` seconds).

/// Accumulates samples and hands out complete blocks of `block_size`.
#[derive(Debug)]
pub struct BlockAssembler {
    block_size: usize,
    pending: Vec<f32>,
}

impl BlockAssembler {
    /// # Panics
    ///
    /// Panics when `block_size` is zero.
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "block_size must be > 0");
        Self {
            block_size,
            pending: Vec::with_capacity(block_size),
        }
    }

    /// Append `samples`; returns every block that became complete.
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.pending.extend_from_slice(samples);
        let mut blocks = Vec::new();
        while self.pending.len() >= self.block_size {
            let rest = self.pending.split_off(self.block_size);
            blocks.push(std::mem::replace(&mut self.pending, rest));
        }
        blocks
    }

    /// Samples waiting for the next block.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}
