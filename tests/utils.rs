use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use quiesce::{
    Configuration, EventId, Notification, NotificationPoster, NotificationProvider, PostError,
    SlotId,
};

/// Provider fixture that resolves identifiers from a scripted set of
/// payloads. Identifiers without a scripted payload resolve to `None`.
pub struct ScriptedProvider {
    notifications: HashMap<EventId, Notification>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            notifications: HashMap::new(),
            delay: None,
        }
    }

    /// Scripts a payload whose title is the identifier itself, which keeps
    /// assertions on posted batches readable.
    pub fn with_event(mut self, identifier: &str) -> Self {
        self.notifications.insert(
            EventId::from(identifier),
            Notification::new(identifier, format!("body of {}", identifier)),
        );
        self
    }

    /// Delays every resolve call by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl NotificationProvider for ScriptedProvider {
    async fn resolve(&self, identifier: &EventId) -> Option<Notification> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.notifications.get(identifier).cloned()
    }
}

/// Shared record of the posts a [`RecordingPoster`] accepted.
#[derive(Clone, Default)]
pub struct PostLog {
    entries: Arc<Mutex<Vec<(SlotId, Notification)>>>,
}

impl PostLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(SlotId, Notification)> {
        self.entries.lock().unwrap().clone()
    }

    /// Titles of the accepted posts, in posting order.
    pub fn titles(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, notification)| notification.title.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Poster fixture that records accepted posts and rejects scripted slots.
pub struct RecordingPoster {
    log: PostLog,
    rejected_slots: HashSet<SlotId>,
}

impl RecordingPoster {
    pub fn new(log: PostLog) -> Self {
        Self {
            log,
            rejected_slots: HashSet::new(),
        }
    }

    /// Rejects every post to the given slot.
    pub fn rejecting(mut self, slot: SlotId) -> Self {
        self.rejected_slots.insert(slot);
        self
    }
}

#[async_trait]
impl NotificationPoster for RecordingPoster {
    async fn post(&self, slot: SlotId, notification: Notification) -> Result<(), PostError> {
        if self.rejected_slots.contains(&slot) {
            return Err(PostError::Rejected("scripted rejection".to_string()));
        }
        self.log.entries.lock().unwrap().push((slot, notification));
        Ok(())
    }
}

/// Returns a session configuration with the given quiet window and logging
/// disabled, so that tests can run several sessions in one process.
pub fn make_test_config(debounce: Duration) -> Configuration {
    Configuration::new()
        .with_debounce_delay(debounce)
        .disable_logger()
}
