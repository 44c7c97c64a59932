//! Deferred Task Runner
//!
//! Runs the futures carried by [`Effect::Spawn`](crate::events::Effect) on the
//! tokio runtime so the event loop never waits on domain I/O. When a task
//! finishes its output is pushed into the loop's queue as an
//! [`Event::DomainResult`] tagged with the view that spawned it.
//!
//! The runner only holds a weak handle on the queue. Each running task owns
//! a strong sender, so the queue closes once input is gone and the last task
//! has reported back.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::events::{DomainResult, Event, Target, Task};

/// Sending half of the loop's event queue
pub type EventSender = mpsc::UnboundedSender<Event>;

type WeakEventSender = mpsc::WeakUnboundedSender<Event>;

/// Spawns deferred tasks and routes their results back into the loop
#[derive(Clone)]
pub struct TaskRunner {
    tx: WeakEventSender,
    in_flight: Arc<AtomicUsize>,
}

impl TaskRunner {
    pub fn new(tx: &EventSender) -> Self {
        Self {
            tx: tx.downgrade(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run `task` in the background on behalf of `origin`
    ///
    /// Without a tokio runtime the task is dropped with a warning. Once every
    /// sender of the queue is gone there is nobody left to report to, so the
    /// task is dropped as well.
    pub fn spawn(&self, origin: Target, task: Task) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%origin, "No async runtime, dropping deferred task");
            return;
        };
        let Some(tx) = self.tx.upgrade() else {
            tracing::debug!(%origin, "Event queue closed, dropping deferred task");
            return;
        };

        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        handle.spawn(async move {
            let payload = task.await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            let result = DomainResult::from_origin(origin, payload);
            if tx.send(Event::DomainResult(result)).is_err() {
                tracing::debug!(%origin, "Event loop gone, discarding task result");
            }
        });

        tracing::debug!(%origin, "Spawned deferred task");
    }

    /// Tasks spawned but not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
