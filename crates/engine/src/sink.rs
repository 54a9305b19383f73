//! Event notification sinks.
//!
//! After an event is persisted it is offered to an [`EventSink`] for
//! downstream consumers. Publication is best effort: the event store waits a
//! bounded time for the acknowledgement and only logs the outcome.

use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use rmap_core::{Event, Iri, RmapError, RmapResult};

/// Pending acknowledgement of one publication
#[derive(Debug)]
pub struct PublishHandle {
    rx: Receiver<RmapResult<()>>,
}

impl PublishHandle {
    /// Handle plus the sender that resolves it
    pub fn channel() -> (Sender<RmapResult<()>>, PublishHandle) {
        let (tx, rx) = mpsc::channel();
        (tx, PublishHandle { rx })
    }

    /// Handle that is already resolved
    pub fn ready(outcome: RmapResult<()>) -> Self {
        let (tx, handle) = Self::channel();
        // receiver is alive, send cannot fail
        let _ = tx.send(outcome);
        handle
    }

    /// Block until acknowledged, failed, or `timeout` elapses
    pub fn wait(self, timeout: Duration) -> RmapResult<()> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(RmapError::internal(format!(
                "publish not acknowledged within {:?}",
                timeout
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(RmapError::internal("publisher dropped without acknowledging"))
            }
        }
    }
}

/// Destination for published events
pub trait EventSink: Send + Sync {
    fn publish(&self, key: &Iri, event: &Event) -> PublishHandle;
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _key: &Iri, _event: &Event) -> PublishHandle {
        PublishHandle::ready(Ok(()))
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    key: &'a Iri,
    event: &'a Event,
}

/// Writes each event as one JSON line
pub struct JsonLinesEventSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_line(&self, key: &Iri, event: &Event) -> RmapResult<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, &Envelope { key, event })
            .map_err(|e| RmapError::internal_with("cannot serialize event", e))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| RmapError::internal_with("cannot write event", e))
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn publish(&self, key: &Iri, event: &Event) -> PublishHandle {
        PublishHandle::ready(self.write_line(key, event))
    }
}
