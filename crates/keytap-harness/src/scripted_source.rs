//! Channel-fed byte source.
//!
//! The test keeps a [`ScriptHandle`] and pushes bytes whenever the scenario
//! calls for them; the listener thread owns the [`ScriptedSource`]. Closing or
//! dropping the handle ends the input once the queued bytes are consumed.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::Duration,
};

use keytap_term::{ByteSource, SourceError};

/// State shared between the source and its handle.
#[derive(Debug, Default)]
struct Shared {
    raw: AtomicBool,
    raw_entries: AtomicUsize,
    restores: AtomicUsize,
    fail_next_read: AtomicBool,
    fail_raw_mode: AtomicBool,
}

/// Byte source replaying what a [`ScriptHandle`] feeds it.
#[derive(Debug)]
pub struct ScriptedSource {
    rx: Receiver<u8>,
    pending: Option<u8>,
    shared: Arc<Shared>,
}

/// Test-side controls for a [`ScriptedSource`].
#[derive(Debug)]
pub struct ScriptHandle {
    tx: Option<Sender<u8>>,
    shared: Arc<Shared>,
}

/// Create a connected source and handle.
pub fn scripted() -> (ScriptedSource, ScriptHandle) {
    let (tx, rx) = mpsc::channel();
    let shared = Arc::new(Shared::default());
    let source = ScriptedSource { rx, pending: None, shared: Arc::clone(&shared) };
    (source, ScriptHandle { tx: Some(tx), shared })
}

impl ScriptHandle {
    /// Queue `bytes` as if typed. Ignored once closed or the source is gone.
    pub fn feed(&self, bytes: &[u8]) {
        let Some(tx) = &self.tx else {
            tracing::debug!("scripted input closed, discarding input");
            return;
        };
        for &byte in bytes {
            if tx.send(byte).is_err() {
                tracing::debug!("scripted source dropped, discarding input");
                return;
            }
        }
    }

    /// End the input. Reads report end of input after the queued bytes.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// Whether the source is currently in raw mode.
    pub fn is_raw(&self) -> bool {
        self.shared.raw.load(Ordering::Acquire)
    }

    /// Times raw mode was entered.
    pub fn raw_entries(&self) -> usize {
        self.shared.raw_entries.load(Ordering::Acquire)
    }

    /// Times the prior mode was restored.
    pub fn restore_count(&self) -> usize {
        self.shared.restores.load(Ordering::Acquire)
    }

    /// Make the next read fail with an I/O error.
    pub fn fail_next_read(&self) {
        self.shared.fail_next_read.store(true, Ordering::Release);
    }

    /// Make entering raw mode fail.
    pub fn fail_raw_mode(&self) {
        self.shared.fail_raw_mode.store(true, Ordering::Release);
    }
}

impl ByteSource for ScriptedSource {
    type Mode = bool;

    fn set_raw_mode(&mut self) -> Result<bool, SourceError> {
        if self.shared.fail_raw_mode.load(Ordering::Acquire) {
            return Err(SourceError::terminal_mode("enable", io::Error::other("scripted failure")));
        }
        self.shared.raw_entries.fetch_add(1, Ordering::AcqRel);
        Ok(self.shared.raw.swap(true, Ordering::AcqRel))
    }

    fn restore_mode(&mut self, prior: bool) -> Result<(), SourceError> {
        self.shared.raw.store(prior, Ordering::Release);
        self.shared.restores.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn poll_available(&mut self, timeout: Duration) -> Result<bool, SourceError> {
        if self.pending.is_some() || self.shared.fail_next_read.load(Ordering::Acquire) {
            return Ok(true);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(byte) => {
                self.pending = Some(byte);
                Ok(true)
            },
            Err(RecvTimeoutError::Timeout) => Ok(false),
            // Readable: the next read reports end of input
            Err(RecvTimeoutError::Disconnected) => Ok(true),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        if self.shared.fail_next_read.swap(false, Ordering::AcqRel) {
            return Err(io::Error::other("scripted read failure").into());
        }
        Ok(self.pending.take().or_else(|| self.rx.try_recv().ok()))
    }
}
