use std::sync::Arc;

use futures_delay_queue::{delay_queue, DelayHandle, DelayQueue, Receiver};
use futures_intrusive::buffer::GrowingHeapBuf;
use tokio::{sync::mpsc::UnboundedReceiver, time};
use uuid::Uuid;

use crate::{
    configuration::Configuration,
    notification::{
        slot_for, EventId, Notification, NotificationPoster, NotificationProvider, SendTime,
        SlotId,
    },
};

use super::{errors::QueueError, pending_queue::PendingQueue};

/// Notifications sent from the driver-facing handle to the scheduler loop.
#[derive(Debug)]
pub(crate) enum DriverNotification {
    /// An event arrived from the delivery transport.
    Arrival(EventId, SendTime),
    /// The session is tearing down.
    Shutdown,
}

/// Token released by the flush queue when an armed timer elapses.
///
/// The generation records which arming produced the token; a token from a
/// superseded arming is ignored by the scheduler loop.
#[derive(Debug)]
struct FlushToken {
    generation: u64,
}

/// `BatchScheduler` owns the pending queue and the flush timer for the
/// lifetime of a session.
///
/// The scheduler is a single-threaded loop: arrivals and teardown reach it as
/// [`DriverNotification`]s on a channel, timer expirations as [`FlushToken`]s
/// on the flush-queue receiver. Because all state is touched from this one
/// loop, an arrival can never race a drain; arrivals that come in while a
/// drain is in progress wait in the channel and join the next batch.
pub(crate) struct BatchScheduler {
    /// The id of the owning session, used to identify it in log records.
    id: Uuid,
    config: Configuration,
    queue: PendingQueue,
    provider: Arc<dyn NotificationProvider>,
    poster: Arc<dyn NotificationPoster>,
    driver_notification_rx: UnboundedReceiver<DriverNotification>,
    flush_queue: DelayQueue<FlushToken, GrowingHeapBuf<FlushToken>>,
    flush_queue_rx: Receiver<FlushToken>,
    /// True while a flush timer is logically outstanding.
    armed: bool,
    /// Generation of the most recent arming; tokens carrying an older
    /// generation belong to superseded timers.
    armed_generation: u64,
    /// Handle of the delay-queue entry backing the current arming.
    armed_handle: Option<DelayHandle>,
}

impl BatchScheduler {
    pub(crate) fn new(
        id: Uuid,
        config: Configuration,
        provider: Arc<dyn NotificationProvider>,
        poster: Arc<dyn NotificationPoster>,
        driver_notification_rx: UnboundedReceiver<DriverNotification>,
    ) -> Self {
        let (flush_queue, flush_queue_rx) = delay_queue();
        let queue = PendingQueue::new(config.dedup_policy);
        Self {
            id,
            config,
            queue,
            provider,
            poster,
            driver_notification_rx,
            flush_queue,
            flush_queue_rx,
            armed: false,
            armed_generation: 0,
            armed_handle: None,
        }
    }

    /// Runs the scheduler loop until the session shuts down.
    pub(crate) async fn run(&mut self) {
        tracing::debug!("Session {}: scheduler running", self.id);
        loop {
            tokio::select! {
                // The flush queue releases a token for every arming,
                // including superseded ones; only the token of the current
                // arming may trigger a drain.
                Some(token) = self.flush_queue_rx.receive() => {
                    if self.armed && token.generation == self.armed_generation {
                        self.armed = false;
                        let _ = self.armed_handle.take();
                        self.drain().await;
                    } else {
                        tracing::trace!(
                            "Session {}: ignoring superseded flush timer (generation {})",
                            self.id,
                            token.generation
                        );
                    }
                }
                driver_notification = self.driver_notification_rx.recv() => {
                    match driver_notification {
                        Some(DriverNotification::Arrival(identifier, send_time)) => {
                            self.on_arrival(identifier, send_time);
                        }
                        Some(DriverNotification::Shutdown) | None => {
                            tracing::debug!("Session {}: scheduler shutting down", self.id);
                            break;
                        }
                    }
                }
            }
        }
        // Dropping the scheduler drops the flush queue with it, so a timer
        // that is still outstanding can no longer fire into the torn-down
        // collaborators.
    }

    /// Queues an arrived event and restarts the quiet window.
    fn on_arrival(&mut self, identifier: EventId, send_time: SendTime) {
        if self.queue.insert(identifier.clone(), send_time) {
            tracing::trace!(
                "Session {}: queued event {} (sent at {})",
                self.id,
                identifier,
                send_time.as_millis()
            );
        } else {
            tracing::debug!(
                "Session {}: coalesced duplicate arrival of {}",
                self.id,
                identifier
            );
        }
        self.arm_flush_timer();
    }

    /// (Re-)arms the flush timer for the configured quiet window, superseding
    /// any timer armed earlier.
    fn arm_flush_timer(&mut self) {
        self.armed_generation += 1;
        let token = FlushToken {
            generation: self.armed_generation,
        };
        let handle = self.flush_queue.insert(token, self.config.debounce_delay);
        self.armed_handle.replace(handle);
        self.armed = true;
    }

    /// Empties the pending queue, resolving and posting each event in
    /// ascending send-time order.
    async fn drain(&mut self) {
        tracing::debug!(
            "Session {}: draining {} pending events",
            self.id,
            self.queue.len()
        );
        let mut posted = 0;
        let mut dropped = 0;
        while !self.queue.is_empty() {
            let event = match self.queue.pop_earliest() {
                Ok(event) => event,
                Err(QueueError::Empty) => break,
            };
            let notification = match self.resolve(&event.identifier).await {
                Some(notification) => notification,
                None => {
                    // The source may have expired the event between its
                    // arrival and the flush; dropping it is expected.
                    tracing::debug!(
                        "Session {}: no content for event {}, dropping",
                        self.id,
                        event.identifier
                    );
                    dropped += 1;
                    continue;
                }
            };
            let slot = slot_for(&event.identifier);
            if self.post(&event.identifier, slot, notification).await {
                posted += 1;
            } else {
                dropped += 1;
            }
        }
        tracing::debug!(
            "Session {}: drained batch ({} posted, {} dropped)",
            self.id,
            posted,
            dropped
        );
    }

    /// Resolves an identifier through the provider, bounding the call if
    /// configured. A call that exceeds the bound counts as unresolved.
    async fn resolve(&self, identifier: &EventId) -> Option<Notification> {
        match self.config.resolve_timeout {
            Some(bound) => match time::timeout(bound, self.provider.resolve(identifier)).await {
                Ok(resolved) => resolved,
                Err(_) => {
                    tracing::warn!(
                        "Session {}: resolving event {} exceeded {:?}",
                        self.id,
                        identifier,
                        bound
                    );
                    None
                }
            },
            None => self.provider.resolve(identifier).await,
        }
    }

    /// Posts a resolved notification, bounding the call if configured.
    ///
    /// Returns false if the post failed or timed out. A failed post never
    /// aborts the remainder of the drain.
    async fn post(&self, identifier: &EventId, slot: SlotId, notification: Notification) -> bool {
        let outcome = match self.config.post_timeout {
            Some(bound) => match time::timeout(bound, self.poster.post(slot, notification)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        "Session {}: posting event {} to slot {} exceeded {:?}",
                        self.id,
                        identifier,
                        slot,
                        bound
                    );
                    return false;
                }
            },
            None => self.poster.post(slot, notification).await,
        };
        match outcome {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    "Session {}: failed to post event {} to slot {}: {}",
                    self.id,
                    identifier,
                    slot,
                    error
                );
                false
            }
        }
    }
}
