//! Channel-backed request queue in front of a publisher.
//!
//! A [`ReliablePublisher`](crate::ReliablePublisher) needs exclusive access for
//! every push. Producers that live in other tasks hand their payloads to a
//! [`SinkHandle`] instead; a single worker running
//! [`ReliablePublisher::run`](crate::ReliablePublisher::run) delivers them one
//! after another.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// A payload waiting to be pushed, sent via channel from producers to the worker.
///
/// The payload is borrowed and must outlive the request. For static buffers
/// (common in embedded), use `'static`.
#[derive(Debug, Clone, Copy)]
pub struct SinkRequest<'a> {
    /// The serialized document to publish
    pub payload: &'a [u8],
}

pub type SinkRequestChannel<'a, const DEPTH: usize> =
    Channel<CriticalSectionRawMutex, SinkRequest<'a>, DEPTH>;

/// Sending half borrowed for `'ch`, carrying payloads that live for `'a`.
pub type SinkRequestSender<'ch, 'a, const DEPTH: usize> =
    Sender<'ch, CriticalSectionRawMutex, SinkRequest<'a>, DEPTH>;

pub type SinkRequestReceiver<'ch, 'a, const DEPTH: usize> =
    Receiver<'ch, CriticalSectionRawMutex, SinkRequest<'a>, DEPTH>;

/// A handle that allows producers to push data without direct access to the
/// publisher.
///
/// This handle wraps a channel sender and can be copied and passed to multiple
/// tasks.
#[derive(Clone, Copy)]
pub struct SinkHandle<'ch, 'a, const DEPTH: usize> {
    tx: SinkRequestSender<'ch, 'a, DEPTH>,
}

impl<'ch, 'a, const DEPTH: usize> SinkHandle<'ch, 'a, DEPTH> {
    pub fn new(tx: SinkRequestSender<'ch, 'a, DEPTH>) -> Self {
        Self { tx }
    }

    /// Queues a payload, waiting while the queue is full.
    pub async fn push(&self, payload: &'a [u8]) {
        self.tx.send(SinkRequest { payload }).await;
    }

    /// Queues a payload without waiting.
    ///
    /// Returns `false` if the queue is full.
    pub fn try_push(&self, payload: &'a [u8]) -> bool {
        self.tx.try_send(SinkRequest { payload }).is_ok()
    }
}
