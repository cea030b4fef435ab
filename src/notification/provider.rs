use async_trait::async_trait;

use super::{errors::PostError, EventId, Notification, SlotId};

/// Resolves event identifiers into fully formed notification payloads.
///
/// Returning `None` means the backing event has expired or was never stored;
/// the identifier is then dropped from the batch without an error. A race
/// between an arrival and the source removing the underlying event is
/// expected and non-fatal.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn resolve(&self, identifier: &EventId) -> Option<Notification>;
}

/// Makes a resolved notification visible to the user.
///
/// Posting is idempotent per slot: posting to a slot that already holds
/// content replaces that content.
#[async_trait]
pub trait NotificationPoster: Send + Sync {
    async fn post(&self, slot: SlotId, notification: Notification) -> Result<(), PostError>;
}
