use std::fmt;

/// Error raised by a [`NotificationPoster`](super::NotificationPoster) when a
/// post call fails.
///
/// A failed post is logged by the draining scheduler and never aborts the
/// remainder of the batch.
#[derive(Debug, PartialEq)]
pub enum PostError {
    /// The display surface rejected the notification.
    Rejected(String),
    /// The display surface is no longer available.
    Closed,
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PostError::Rejected(reason) => write!(f, "notification rejected: {}", reason),
            PostError::Closed => write!(f, "display surface closed"),
        }
    }
}
