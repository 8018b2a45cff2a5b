//! Network side of the simulation boundary
//!
//! The simulation never blocks on the transport: outbound messages are queued with
//! `try_send` and dropped (with a warning) when the queue is full or closed, and inbound
//! messages are drained with `try_recv` once per tick.

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tracing::{debug, warn};

use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Counters for the boundary, exposed for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub sent: u64,
    pub dropped: u64,
    pub received: u64,
}

/// Simulation-owned end of the transport link
pub struct SyncBoundary {
    outbound: mpsc::Sender<ClientMsg>,
    inbound: mpsc::Receiver<ServerMsg>,
    inbound_capacity: usize,
    inbound_closed: bool,
    stats: SyncStats,
}

/// Transport-owned end: read what the simulation queued, push what the room relayed
pub struct TransportEndpoint {
    pub outbound_rx: mpsc::Receiver<ClientMsg>,
    pub inbound_tx: mpsc::Sender<ServerMsg>,
}

impl SyncBoundary {
    /// Create a linked boundary/transport pair with bounded queues
    pub fn connect(capacity: usize) -> (Self, TransportEndpoint) {
        let capacity = capacity.max(1);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);

        let boundary = Self {
            outbound: outbound_tx,
            inbound: inbound_rx,
            inbound_capacity: capacity,
            inbound_closed: false,
            stats: SyncStats::default(),
        };
        let transport = TransportEndpoint {
            outbound_rx,
            inbound_tx,
        };
        (boundary, transport)
    }

    /// Fire-and-forget send. Returns whether the message was queued.
    pub fn send(&mut self, msg: ClientMsg) -> bool {
        match self.outbound.try_send(msg) {
            Ok(()) => {
                self.stats.sent += 1;
                true
            }
            Err(TrySendError::Full(msg)) => {
                self.stats.dropped += 1;
                warn!(dropped = self.stats.dropped, msg = ?msg, "Outbound sync queue full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.dropped += 1;
                if self.stats.dropped == 1 || self.stats.dropped % 600 == 0 {
                    warn!(dropped = self.stats.dropped, "Outbound sync queue closed");
                }
                false
            }
        }
    }

    /// Take everything currently queued inbound, oldest first. Bounded by the queue
    /// capacity so a chatty transport cannot stall a tick.
    pub fn drain(&mut self) -> Vec<ServerMsg> {
        let mut messages = Vec::new();
        while messages.len() < self.inbound_capacity {
            match self.inbound.try_recv() {
                Ok(msg) => messages.push(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.inbound_closed {
                        warn!("Inbound sync queue disconnected, continuing with stale remote state");
                        self.inbound_closed = true;
                    }
                    break;
                }
            }
        }

        if !messages.is_empty() {
            self.stats.received += messages.len() as u64;
            debug!(count = messages.len(), "Ingested inbound sync messages");
        }
        messages
    }

    pub fn is_connected(&self) -> bool {
        !self.outbound.is_closed() && !self.inbound_closed
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }
}
