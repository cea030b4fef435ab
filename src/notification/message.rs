use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque token naming one arrived event, as assigned by the delivery
/// transport.
///
/// Identifiers are consumed and discarded once the batch containing them is
/// drained; the session never interprets their contents beyond hashing them
/// into a display slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0[..]
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The fully formed displayable payload resolved for an event identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Short headline shown to the user.
    pub title: String,
    /// Body text of the notification.
    pub body: String,
    /// Optional grouping tag, used by posters that stack related
    /// notifications together.
    pub group: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            group: None,
        }
    }

    /// Assigns a grouping tag to the notification.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Notification(title: {})", self.title)
    }
}
