//! Quiesce coalesces bursts of incoming asynchronous event notifications
//! (e.g. push messages) that arrive faster than the user should be
//! interrupted, and releases them as a single deferred batch once a quiet
//! period elapses.
//!
//! Arriving events are enqueued by identifier and send time into a
//! [`batch::PendingQueue`]. Each arrival re-arms a single flush timer for the
//! configured quiet window, so a sustained burst keeps deferring the flush
//! until a gap of at least the window occurs. When the timer fires, the
//! [session](crate::batch::Session)'s scheduler drains the queue in send-time
//! order, resolves every identifier into a full [`Notification`] through the
//! injected [`NotificationProvider`], and hands each resolved payload to the
//! injected [`NotificationPoster`] under a deterministic display slot, so a
//! re-posted identifier overwrites its earlier rendition instead of
//! duplicating it.
//!
//! ## Example
//! The example shows a host application wiring its push transport into a
//! coalescing session. The transport calls
//! [`notify_arrival`](crate::batch::SessionHandle::notify_arrival) from its
//! delivery callback; the session takes care of everything else.
//!
//! ```ignore
//! // Capture arguments to configure the session.
//! let args = quiesce::new_app("PushCoalescer").get_matches();
//! let config = Configuration::from_args(&args);
//!
//! // The store that maps identifiers to full notification payloads, and the
//! // surface that makes them visible to the user.
//! let provider = Arc::new(MessageStoreProvider::new(store));
//! let poster = Arc::new(StatusAreaPoster::new(status_area));
//!
//! // Run the session on its own thread and hand the arrival callback to the
//! // transport.
//! let session = Session::new(config, provider, poster);
//! let handle = session.run_async();
//! transport.on_delivery(move |send_id, sent_at| {
//!     handle.notify_arrival(EventId::from(send_id), SendTime::new(sent_at)).ok();
//! });
//! ```
//!
//! ## Batching semantics
//! The flush timer is a debounce, not a fixed-interval window: the deadline
//! slides forward with every arrival. Draining is best-effort; an identifier
//! whose payload can no longer be resolved is dropped silently, and a failed
//! post never aborts the remainder of the batch.

// Libraries used in this file.
use clap::{self, App, Arg};

// Private submodules
mod configuration;

// Public submodules
pub mod batch;
pub mod notification;

// Public exports
pub use batch::{DedupPolicy, Session, SessionHandle};
pub use configuration::{Configuration, DEFAULT_DEBOUNCE_DELAY};
pub use notification::{
    slot_for, EventId, Notification, NotificationPoster, NotificationProvider, PostError, SendTime,
    SlotId,
};

/// Defines command line arguments for configuring a coalescing session inside
/// a host application.
pub fn new_app(name: &str) -> clap::App {
    App::new(name)
        .arg(
            Arg::with_name("delay")
                .short("d")
                .long("delay")
                .default_value("5000")
                .help("Quiet period in milliseconds before a pending batch is flushed"),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .default_value("2")
                .help("Number of runtime threads used by the session"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .takes_value(false)
                .help("Sets the level of verbosity"),
        )
}
