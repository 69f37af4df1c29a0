//! # Event Scheduler
//!
//! Recurring, cancelable callbacks: "run again in N seconds unless told to
//! stop". Each scheduled event is a tokio task whose cancellation token is a
//! child of the process shutdown token, so a shutdown request reaches every
//! event without anyone walking the list.
//!
//! ```text
//! schedule(period, f)
//!   └─► task: loop {
//!            shutdown? ──► exit
//!            f() == Stop ──► exit
//!            sleep(period) | cancelled ──► exit
//!        }
//! ```
//!
//! The callback runs once immediately, before the first sleep.
//!
//! Finished tasks stay in the live list until someone calls
//! [`EventScheduler::prune_finished`]; the dispatcher does this on every idle
//! poll. [`EventScheduler::shutdown`] cancels whatever is still pending while
//! holding the events lock, then awaits every task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What a callback wants after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventControl {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

struct ScheduledEvent {
    id: EventId,
    name: String,
    period: Duration,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct SchedulerInner {
    events: Mutex<Vec<ScheduledEvent>>,
    shutdown: CancellationToken,
    runtime: Handle,
    next_id: AtomicU64,
}

/// Cheap to clone; all clones share one live-events list.
#[derive(Clone)]
pub struct EventScheduler {
    inner: Arc<SchedulerInner>,
}

impl EventScheduler {
    /// Must be called from inside a tokio runtime; events are spawned onto it
    /// even when `schedule` is later called from a blocking thread.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                events: Mutex::new(Vec::new()),
                shutdown,
                runtime: Handle::current(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Schedule `callback` every `period` until it returns
    /// [`EventControl::Stop`], the event is cancelled, or shutdown begins.
    ///
    /// Returns `None` once shutdown has been requested: no new events are
    /// created after that point.
    pub fn schedule<F>(&self, name: &str, period: Duration, mut callback: F) -> Option<EventId>
    where
        F: FnMut() -> EventControl + Send + 'static,
    {
        let mut events = self.lock_events();
        if self.inner.shutdown.is_cancelled() {
            debug!("Refusing to schedule '{}': shutting down", name);
            return None;
        }

        let id = EventId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = self.inner.shutdown.child_token();
        let task_cancel = cancel.clone();
        let task_name = name.to_string();

        let handle = self.inner.runtime.spawn(async move {
            loop {
                if task_cancel.is_cancelled() {
                    debug!("{} ({}) cancelled", task_name, id);
                    return;
                }
                // Callbacks may take the render lock and draw.
                let invoked = tokio::task::spawn_blocking(move || {
                    let control = callback();
                    (control, callback)
                })
                .await;
                let control = match invoked {
                    Ok((control, returned)) => {
                        callback = returned;
                        control
                    }
                    Err(e) => {
                        warn!("{} ({}) callback failed: {}", task_name, id, e);
                        return;
                    }
                };
                if control == EventControl::Stop {
                    debug!("{} ({}) finished", task_name, id);
                    return;
                }
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => {
                        debug!("{} ({}) cancelled while sleeping", task_name, id);
                        return;
                    }
                    _ = tokio::time::sleep(period) => {}
                }
            }
        });

        info!("Scheduled '{}' as {} every {:?}", name, id, period);
        events.push(ScheduledEvent {
            id,
            name: name.to_string(),
            period,
            cancel,
            handle,
        });
        Some(id)
    }

    /// Cancel a single event. Returns `false` if it is unknown or already pruned.
    pub fn cancel(&self, id: EventId) -> bool {
        let events = self.lock_events();
        match events.iter().find(|event| event.id == id) {
            Some(event) => {
                event.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop events whose task has completed. Returns how many were removed.
    pub fn prune_finished(&self) -> usize {
        let mut events = self.lock_events();
        let before = events.len();
        events.retain(|event| {
            let finished = event.handle.is_finished();
            if finished {
                debug!("Pruning {} '{}' (period {:?})", event.id, event.name, event.period);
            }
            !finished
        });
        before - events.len()
    }

    /// Number of events still in the live list (finished-but-unpruned included).
    pub fn live_count(&self) -> usize {
        self.lock_events().len()
    }

    /// Number of events whose task is still running.
    pub fn running_count(&self) -> usize {
        self.lock_events()
            .iter()
            .filter(|event| !event.handle.is_finished())
            .count()
    }

    /// Cancel every pending event and wait for all of their tasks.
    ///
    /// Cancellation happens under the events lock so no event can slip in
    /// between the cancel pass and the join.
    pub async fn shutdown(&self) {
        let handles: Vec<(EventId, JoinHandle<()>)> = {
            let mut events = self.lock_events();
            for event in events.iter() {
                event.cancel.cancel();
            }
            events.drain(..).map(|event| (event.id, event.handle)).collect()
        };

        info!("Joining {} scheduled event(s)", handles.len());
        let (ids, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        for (id, result) in ids.into_iter().zip(futures::future::join_all(handles).await) {
            if let Err(e) = result {
                warn!("{} ended abnormally: {}", id, e);
            }
        }
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<ScheduledEvent>> {
        self.inner.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
