//! # Message Dispatch
//!
//! The outgoing side of the client. The foreground editor pushes submitted
//! lines onto an unbounded FIFO queue; a single background task drains it.
//!
//! ```text
//!  InputLoop ──push──► [ queue ] ──recv (bounded wait)──► MessageDispatcher
//!                                                          │
//!                              transport.send(msg) ◄───────┤
//!                              surface.repaint()   ◄───────┤
//!                   on timeout: scheduler.prune_finished() ┘
//! ```
//!
//! The dispatcher never blocks for longer than one poll interval, so it
//! notices a shutdown request promptly even when nobody is typing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::scheduler::EventScheduler;
use crate::core::transport::{OutgoingMessage, Transport};

/// Poll interval used when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// What the dispatcher needs from the screen. Implemented by the render lock.
pub trait Repaint: Send + Sync {
    /// Recompute and flush the whole visible state.
    fn repaint(&self);

    /// Update the busy indicator. Returns `true` if it changed.
    fn set_busy(&self, busy: bool) -> bool;
}

#[derive(Debug)]
pub enum DispatchError {
    /// The dispatcher has stopped and nobody is draining the queue.
    Closed,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Closed => write!(f, "dispatcher stopped, message dropped"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Producer side of the dispatch queue.
#[derive(Debug, Clone)]
pub struct DispatchQueue {
    sender: UnboundedSender<OutgoingMessage>,
}

impl DispatchQueue {
    pub fn push(&self, message: OutgoingMessage) -> Result<(), DispatchError> {
        self.sender.send(message).map_err(|_| DispatchError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Create the queue. The receiver goes to [`MessageDispatcher::new`].
pub fn channel() -> (DispatchQueue, UnboundedReceiver<OutgoingMessage>) {
    let (sender, receiver) = unbounded_channel();
    (DispatchQueue { sender }, receiver)
}

pub struct MessageDispatcher {
    queue: UnboundedReceiver<OutgoingMessage>,
    transport: Arc<dyn Transport>,
    surface: Arc<dyn Repaint>,
    scheduler: EventScheduler,
    shutdown: CancellationToken,
    poll_interval: Duration,
}

impl MessageDispatcher {
    pub fn new(
        queue: UnboundedReceiver<OutgoingMessage>,
        transport: Arc<dyn Transport>,
        surface: Arc<dyn Repaint>,
        scheduler: EventScheduler,
        shutdown: CancellationToken,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            transport,
            surface,
            scheduler,
            shutdown,
            poll_interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        info!(
            "Dispatcher started (transport={}, poll={:?})",
            self.transport.name(),
            self.poll_interval
        );
        let mut delivered = 0usize;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                received = tokio::time::timeout(self.poll_interval, self.queue.recv()) => {
                    match received {
                        Ok(Some(message)) => {
                            self.deliver(message).await;
                            delivered += 1;
                        }
                        Ok(None) => {
                            info!("Dispatch queue closed");
                            break;
                        }
                        Err(_) => {
                            self.on_surface(|surface| {
                                if surface.set_busy(false) {
                                    surface.repaint();
                                }
                            })
                            .await;
                        }
                    }
                }
            }

            let pruned = self.scheduler.prune_finished();
            if pruned > 0 {
                debug!("Pruned {} finished event(s)", pruned);
            }
        }

        info!("Dispatcher stopped after {} message(s)", delivered);
    }

    async fn deliver(&self, message: OutgoingMessage) {
        self.on_surface(|surface| {
            surface.set_busy(true);
        })
        .await;
        debug!("Sending {} bytes via {}", message.text.len(), self.transport.name());
        if let Err(e) = self.transport.send(&message).await {
            warn!("Transport '{}' failed to send: {}", self.transport.name(), e);
        }
        self.on_surface(|surface| surface.repaint()).await;
    }

    /// Run `work` against the surface on the blocking pool.
    ///
    /// Surface calls take the render lock and may flush the terminal, which
    /// must not stall an async worker.
    async fn on_surface<R, F>(&self, work: F) -> Option<R>
    where
        R: Send + 'static,
        F: FnOnce(&dyn Repaint) -> R + Send + 'static,
    {
        let surface = Arc::clone(&self.surface);
        match tokio::task::spawn_blocking(move || work(surface.as_ref())).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Surface update failed: {}", e);
                None
            }
        }
    }
}
