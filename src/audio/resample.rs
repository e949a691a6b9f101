//! Channel mixing and sample-rate conversion to the recognizer's format.
//!
//! Speech engines consume **16 kHz mono `f32`**.  Capture devices usually
//! deliver 44.1/48 kHz interleaved stereo, so every chunk goes through
//! [`to_mono`] and then a [`Resampler`].
//!
//! Resampling is linear interpolation; for short command words that is
//! indistinguishable from a windowed-sinc resampler.

/// Sample rate every speech engine in this crate expects.
pub const TARGET_RATE: u32 = 16_000;

/// Average interleaved channels down to one.
///
/// `channels == 0` yields an empty vector; a trailing partial frame is
/// dropped.
pub fn to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = usize::from(n);
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Streaming linear resampler.
///
/// Chunk boundaries are invisible: the read position and the last input
/// sample carry over to the next call, so the output of any chunking equals
/// the output of resampling the whole stream at once.
#[derive(Debug, Clone)]
pub struct Resampler {
    from_rate: u32,
    to_rate: u32,
    /// Input samples advanced per output sample.
    step: f64,
    /// Position of the next output sample, relative to `carry` (or to the
    /// first sample of the next chunk while `carry` is `None`).
    pos: f64,
    carry: Option<f32>,
}

impl Resampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Self {
        let step = if to_rate == 0 {
            1.0
        } else {
            f64::from(from_rate) / f64::from(to_rate)
        };
        Self {
            from_rate,
            to_rate,
            step,
            pos: 0.0,
            carry: None,
        }
    }

    fn is_passthrough(&self) -> bool {
        self.from_rate == self.to_rate || self.from_rate == 0 || self.to_rate == 0
    }

    /// Resample the next chunk of a continuous mono stream.
    pub fn process(&mut self, chunk: &[f32]) -> Vec<f32> {
        if self.is_passthrough() {
            return chunk.to_vec();
        }
        let mut input = Vec::with_capacity(chunk.len() + 1);
        input.extend(self.carry);
        input.extend_from_slice(chunk);
        let Some(&last) = input.last() else {
            return Vec::new();
        };

        let span = (input.len() - 1) as f64;
        let mut out = Vec::with_capacity((span / self.step) as usize + 1);
        while self.pos < span {
            let idx = self.pos as usize;
            let frac = (self.pos - idx as f64) as f32;
            out.push(input[idx] + (input[idx + 1] - input[idx]) * frac);
            self.pos += self.step;
        }

        self.pos -= span;
        self.carry = Some(last);
        out
    }
}
