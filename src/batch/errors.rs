use std::fmt;

/// Error raised by operations on the pending queue.
#[derive(Debug, PartialEq)]
pub enum QueueError {
    /// A pop was attempted on an empty queue. The drain loop guards against
    /// this internally; it never surfaces from a session.
    Empty,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueueError::Empty => write!(f, "pending queue is empty"),
        }
    }
}

/// Error raised when notifying a session that has already been torn down.
#[derive(Debug, PartialEq)]
pub enum NotifyError {
    /// The scheduler loop has exited and no longer accepts arrivals.
    Disconnected,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotifyError::Disconnected => write!(f, "session has shut down"),
        }
    }
}
