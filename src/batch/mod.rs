//! The batching core: the ordered pending-event queue, the debounce timer
//! that decides when to flush, and the scheduler loop that drains queued
//! identifiers through the injected collaborators.
//!
//! A [`Session`] owns one scheduler for its entire lifetime. Arrivals enter
//! through a [`SessionHandle`] and are delivered to the scheduler's
//! single-threaded loop as messages, so the pending queue is never touched
//! from more than one thread.

// Private submodules
mod pending_queue;
mod scheduler;
mod session;

// Crate-wide visible submodules
pub(crate) mod pending_event;

// Public submodules
pub mod errors;

// Public exports
pub use pending_event::PendingEvent;
pub use pending_queue::{DedupPolicy, PendingQueue};
pub use session::{Session, SessionHandle};
