//! Utterance segmentation over fixed audio blocks.
//!
//! ```text
//! silent ... silent | VOICED VOICED silent | silent ...
//!          pre-roll ^-------- utterance ---^ finalized after N silent blocks
//! ```
//!
//! One silent block preceding the first voiced block is kept as pre-roll so
//! that a soft word onset is not clipped.

use crate::audio::EnergyVad;

#[derive(Debug)]
pub struct UtteranceSegmenter {
    vad: EnergyVad,
    trailing_silence_blocks: usize,
    max_samples: usize,
    pre_roll: Option<Vec<f32>>,
    current: Vec<f32>,
    silent_run: usize,
    in_speech: bool,
}

impl UtteranceSegmenter {
    /// `trailing_silence_blocks` is clamped to at least 1.  An utterance
    /// reaching `max_samples` is finalized even while still voiced.
    pub fn new(vad: EnergyVad, trailing_silence_blocks: usize, max_samples: usize) -> Self {
        Self {
            vad,
            trailing_silence_blocks: trailing_silence_blocks.max(1),
            max_samples,
            pre_roll: None,
            current: Vec::new(),
            silent_run: 0,
            in_speech: false,
        }
    }

    /// Feed one block; returns the utterance audio when one just finished.
    pub fn push_block(&mut self, block: &[f32]) -> Option<Vec<f32>> {
        let voiced = self.vad.is_voiced(block);

        if !self.in_speech {
            if !voiced {
                self.pre_roll = Some(block.to_vec());
                return None;
            }
            self.in_speech = true;
            self.silent_run = 0;
            self.current = self.pre_roll.take().unwrap_or_default();
        }

        self.current.extend_from_slice(block);
        if voiced {
            self.silent_run = 0;
        } else {
            self.silent_run += 1;
        }

        if self.silent_run >= self.trailing_silence_blocks || self.current.len() >= self.max_samples {
            return Some(self.finish());
        }
        None
    }

    pub fn in_speech(&self) -> bool {
        self.in_speech
    }

    fn finish(&mut self) -> Vec<f32> {
        self.in_speech = false;
        self.silent_run = 0;
        self.pre_roll = None;
        let mut utterance = std::mem::take(&mut self.current);
        utterance.truncate(self.max_samples);
        utterance
    }
}
