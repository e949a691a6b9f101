//! Microphone capture via `cpal`, delivered as fixed 16 kHz mono blocks.
//!
//! `cpal::Stream` is not `Send` on every platform, so the stream lives on a
//! dedicated `audio-capture` thread for its whole life.  That thread
//! downmixes, resamples and re-chunks the callback buffers and forwards
//! complete blocks over a channel.  [`MicrophoneBlocks`] is the `Send`
//! receiving end the voice loop reads from; dropping it stops the thread and
//! with it the hardware stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::blocks::BlockAssembler;
use super::resample::{to_mono, Resampler, TARGET_RATE};

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One callback buffer as delivered by cpal, interleaved `f32`.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The capture thread could not be spawned or died during startup.
    #[error("audio capture thread failed: {0}")]
    Thread(String),
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Default input device plus its preferred stream configuration.
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Open the system default input device.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when no input device exists, or
    /// [`CaptureError::DefaultConfig`] when it cannot report a configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;

        Ok(Self {
            device,
            config: supported.into(),
            sample_rate,
            channels,
        })
    }

    /// Start the hardware stream; every callback buffer is sent to `tx`.
    ///
    /// The stream stops when the returned value is dropped.
    pub fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<cpal::Stream, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Receiver gone means capture is shutting down.
                let _ = tx.send(AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| {
                log::error!("voice: cpal stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(stream)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// MicrophoneBlocks
// ---------------------------------------------------------------------------

/// How often the capture thread re-checks its stop flag while idle.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Fixed-size 16 kHz mono blocks from the default microphone.
pub struct MicrophoneBlocks {
    blocks: mpsc::Receiver<Vec<f32>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MicrophoneBlocks {
    /// Open the default microphone and start producing blocks of
    /// `block_size` samples.
    ///
    /// Returns only after the device has been opened and the stream started,
    /// so any device problem is reported here rather than on first read.
    pub fn open(block_size: usize) -> Result<Self, CaptureError> {
        let block_size = block_size.max(1);
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(u32, u16), CaptureError>>(1);
        let (block_tx, block_rx) = mpsc::channel::<Vec<f32>>();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let (chunk_tx, chunk_rx) = mpsc::channel::<AudioChunk>();
                let opened = AudioCapture::new().and_then(|capture| {
                    let stream = capture.start(chunk_tx)?;
                    Ok((capture.sample_rate(), capture.channels(), stream))
                });

                let (_stream, mut resampler) = match opened {
                    Ok((rate, channels, stream)) => {
                        let _ = ready_tx.send(Ok((rate, channels)));
                        (stream, Resampler::new(rate, TARGET_RATE))
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                let mut assembler = BlockAssembler::new(block_size);
                while !stop_flag.load(Ordering::Relaxed) {
                    let chunk = match chunk_rx.recv_timeout(STOP_POLL) {
                        Ok(chunk) => chunk,
                        Err(mpsc::RecvTimeoutError::Timeout) => continue,
                        Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    };
                    let mono = resampler.process(&to_mono(&chunk.samples, chunk.channels));
                    for block in assembler.push(&mono) {
                        if block_tx.send(block).is_err() {
                            return;
                        }
                    }
                }
            })
            .map_err(|e| CaptureError::Thread(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok((rate, channels))) => {
                log::info!("voice: microphone open ({rate} Hz, {channels} ch, {block_size}-sample blocks)");
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(CaptureError::Thread("capture thread exited during startup".into()));
            }
        }

        Ok(Self {
            blocks: block_rx,
            stop,
            thread: Some(thread),
        })
    }

    /// Block until the next complete block.  `None` once capture has ended.
    pub fn next_block(&self) -> Option<Vec<f32>> {
        self.blocks.recv().ok()
    }
}

impl Drop for MicrophoneBlocks {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
