//! Energy-based voice activity detection on fixed audio blocks.
//!
//! A block is *voiced* when its RMS amplitude exceeds the threshold.  This is
//! only used to decide where an utterance starts and ends; recognition
//! quality is the engine's job.

/// RMS gate for a single block.
#[derive(Debug, Clone, Copy)]
pub struct EnergyVad {
    threshold: f32,
}

impl EnergyVad {
    /// `threshold` is an RMS level in `[0.0, 1.0]`; `0.01` suits a quiet room.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_voiced(&self, block: &[f32]) -> bool {
        rms(block) > self.threshold
    }
}

/// Root-mean-square amplitude; `0.0` for an empty block.
pub fn rms(block: &[f32]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }
    let mean_sq = block.iter().map(|s| s * s).sum::<f32>() / block.len() as f32;
    mean_sq.sqrt()
}
