use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// The instant at which an event was sent by its source, in milliseconds
/// since the Unix epoch.
///
/// Send times establish the order in which queued events are drained:
/// earliest first, with ties broken by arrival order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SendTime(u64);

impl SendTime {
    /// Creates a send time from milliseconds since the Unix epoch.
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// The send time corresponding to the current wall clock.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(since_epoch.as_millis() as u64)
    }

    /// Milliseconds since the Unix epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SendTime {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}
