use std::{cmp::Ordering, fmt};

use crate::notification::{EventId, SendTime};

/// `PendingEvent` is one arrived event awaiting resolution, as stored in the
/// [`PendingQueue`](super::PendingQueue).
///
/// Events are ordered by send time, earliest first, with ties broken by the
/// order of insertion into the queue. The comparisons are reversed so that a
/// max-first `BinaryHeap` yields the earliest event at the top.
#[derive(Clone)]
pub struct PendingEvent {
    /// The identifier under which the full payload can be resolved.
    pub identifier: EventId,
    /// The instant the event was sent by its source.
    pub send_time: SendTime,
    /// Position in the queue's insertion order, used to keep equal send
    /// times FIFO.
    pub(crate) sequence: u64,
}

impl PendingEvent {
    pub(crate) fn new(identifier: EventId, send_time: SendTime, sequence: u64) -> Self {
        Self {
            identifier,
            send_time,
            sequence,
        }
    }
}

// Implement the `Display` and `Debug` traits so that we can visualize the event.
impl fmt::Display for PendingEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PendingEvent(id: {}, send_time: {})",
            self.identifier,
            self.send_time.as_millis()
        )
    }
}

impl fmt::Debug for PendingEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PendingEvent(id: {}, send_time: {})",
            self.identifier,
            self.send_time.as_millis()
        )
    }
}

// Implement traits to define the order in which the events are drained.
impl Eq for PendingEvent {}

impl PartialEq for PendingEvent {
    fn eq(&self, other: &PendingEvent) -> bool {
        match self.cmp(other) {
            Ordering::Equal => true,
            _ => false,
        }
    }
}

impl Ord for PendingEvent {
    fn cmp(&self, other: &PendingEvent) -> Ordering {
        match self.send_time.cmp(&other.send_time) {
            // The event with the lower send time must surface first from the
            // max-heap, so the comparison is reversed.
            Ordering::Less => Ordering::Greater,
            Ordering::Greater => Ordering::Less,
            Ordering::Equal => {
                // Break ties with the order of insertion into the queue.
                self.sequence.cmp(&other.sequence).reverse()
            }
        }
    }
}

impl PartialOrd for PendingEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
