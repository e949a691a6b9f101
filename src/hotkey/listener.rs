//! Dedicated OS-thread abort-key listener using `rdev::listen`.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Dropping the listener
//! sets a stop flag so presses are no longer latched, but the OS thread stays
//! blocked in the rdev event loop until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use super::{AbortKey, KeyLatch};

/// Handle to a running listener thread.  Latches a [`KeyLatch`] on every
/// press of the watched key.
pub struct AbortKeyListener {
    latch: KeyLatch,
    stop: Arc<AtomicBool>,
    _thread: std::thread::JoinHandle<()>,
}

impl AbortKeyListener {
    /// Spawn the listener thread for `key`.
    ///
    /// A platform that refuses global key hooks (e.g. Wayland without
    /// permissions) is only logged from the thread; the handle then simply
    /// never reports a press.
    pub fn start(key: rdev::Key) -> std::io::Result<Self> {
        let latch = KeyLatch::new();
        let stop = Arc::new(AtomicBool::new(false));

        let thread_latch = latch.clone();
        let thread_stop = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("abort-key-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if thread_stop.load(Ordering::Relaxed) {
                        return;
                    }
                    if let rdev::EventType::KeyPress(k) = event.event_type {
                        if k == key {
                            log::debug!("hotkey: abort key pressed");
                            thread_latch.press();
                        }
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey: rdev::listen exited with error: {e:?}");
                }
            })?;

        log::info!("hotkey: listening for {key:?}");

        Ok(Self {
            latch,
            stop,
            _thread: thread,
        })
    }
}

impl AbortKey for AbortKeyListener {
    fn take_pressed(&self) -> bool {
        self.latch.take_pressed()
    }

    fn clear(&self) {
        self.latch.clear();
    }
}

impl Drop for AbortKeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
