//! Best-effort progress reporting out of the search loop.
use flume::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of a running search, emitted every `progress_interval` attempts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Nonce whose hash is carried in this event.
    pub nonce: u32,
    pub hash: [u8; 32],
    /// Attempts completed so far, including `nonce`.
    pub attempts: u64,
    pub elapsed: Duration,
}

impl ProgressEvent {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Hashes per second since the run started.
    pub fn hash_rate(&self) -> f64 {
        rate(self.attempts, self.elapsed)
    }
}

pub(crate) fn rate(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        attempts as f64 / secs
    } else {
        0.0
    }
}

/// A sink for progress events.
///
/// For searches started with `MiningEngine::start`, the search thread only
/// `try_send`s into a bounded buffer and `report` runs on a separate delivery
/// thread, so a slow reporter loses events instead of stalling the search.
/// `MiningEngine::mine_blocking` calls `report` inline on the caller's thread.
pub trait ProgressReporter: Send {
    fn report(&mut self, event: ProgressEvent);
}

/// Discards every event.
impl ProgressReporter for () {
    fn report(&mut self, _event: ProgressEvent) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(ProgressEvent) + Send,
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Bounded channel reporter; drops events when the buffer is full.
#[derive(Debug)]
pub struct ChannelReporter {
    tx: Option<Sender<ProgressEvent>>,
    dropped: u64,
}

impl ChannelReporter {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self {
            tx: Some(tx),
            dropped: 0,
        }
    }

    /// Events discarded because the consumer was behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&mut self, event: ProgressEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                // backpressure: the consumer is behind, skip this one
                self.dropped += 1;
            }
            Err(TrySendError::Disconnected(_)) => {
                self.tx = None;
            }
        }
    }
}

/// Reporter and receiver pair over a bounded channel of `capacity` events.
pub fn progress_channel(capacity: usize) -> (ChannelReporter, Receiver<ProgressEvent>) {
    let (tx, rx) = flume::bounded(capacity.max(1));
    (ChannelReporter::new(tx), rx)
}
