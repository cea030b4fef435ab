use std::{sync::Arc, thread};

use tokio::{
    runtime::Builder,
    sync::mpsc::{self, UnboundedSender},
};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use uuid::Uuid;

use crate::{
    configuration::Configuration,
    notification::{EventId, NotificationPoster, NotificationProvider, SendTime},
};

use super::{
    errors::NotifyError,
    scheduler::{BatchScheduler, DriverNotification},
};

/// The process-wide state of one coalescing session.
///
/// A `Session` is constructed once at session start with the provider and
/// poster collaborators injected, and owns the scheduler, its runtime, and
/// the flush timer until the host session ends. Arrivals are fed in through a
/// [`SessionHandle`].
pub struct Session {
    /// Session's configuration parameters.
    config: Configuration,
    /// Unique session id, used to identify the session in log records.
    id: Uuid,
    /// Channel used to deliver arrivals and the shutdown signal to the
    /// scheduler loop.
    driver_tx: UnboundedSender<DriverNotification>,
    scheduler: Option<BatchScheduler>,
    // Flushes buffered logs when dropped.
    _logger_guard: Option<WorkerGuard>,
}

impl Session {
    /// Creates a new session.
    pub fn new(
        config: Configuration,
        provider: Arc<dyn NotificationProvider>,
        poster: Arc<dyn NotificationPoster>,
    ) -> Self {
        // Set up the logger.
        let logger_guard = if let Some(logging_level) = config.logging_level {
            let display_thread_ids = logging_level >= Level::TRACE;
            let display_target = logging_level >= Level::TRACE;

            let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
            let subscriber = tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_thread_ids(display_thread_ids)
                .with_span_events(FmtSpan::FULL)
                .with_target(display_target)
                .with_max_level(logging_level);
            subscriber.init();

            Some(guard)
        } else {
            None
        };

        let id = Uuid::new_v4();
        let (driver_tx, driver_rx) = mpsc::unbounded_channel();
        let scheduler = BatchScheduler::new(
            id,
            config.clone(),
            provider,
            poster,
            driver_rx,
        );
        Self {
            config,
            id,
            driver_tx,
            scheduler: Some(scheduler),
            _logger_guard: logger_guard,
        }
    }

    /// Returns a handle for feeding arrivals into the session.
    ///
    /// Handles minted this way cannot join the session thread; use the
    /// handle returned by [`Session::run_async`] for teardown.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            driver_tx: self.driver_tx.clone(),
            thread_handle: None,
        }
    }

    /// Runs the session's scheduler loop on the calling thread.
    ///
    /// The method returns only after the session is shut down through a
    /// handle.
    pub fn run(&mut self) {
        tracing::debug!("Session {}: running", self.id);
        // Build a runtime with n threads.
        let runtime = Builder::new_multi_thread()
            .worker_threads(self.config.num_threads)
            .thread_name(format!("session-{}", self.id))
            .enable_all()
            .build()
            .unwrap();
        let mut scheduler = self
            .scheduler
            .take()
            .expect("The session was already run.");
        runtime.block_on(scheduler.run());
        tracing::debug!("Session {}: finished running", self.id);
    }

    /// Runs the session in a separate OS thread.
    ///
    /// The method immediately returns a handle through which arrivals are
    /// fed and the session is eventually shut down.
    pub fn run_async(mut self) -> SessionHandle {
        // Clone to avoid move to other thread.
        let driver_tx = self.driver_tx.clone();
        let thread_handle = thread::spawn(move || {
            self.run();
        });

        SessionHandle {
            driver_tx,
            thread_handle: Some(thread_handle),
        }
    }
}

/// Driver-facing handle of a running [`Session`].
pub struct SessionHandle {
    driver_tx: UnboundedSender<DriverNotification>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl SessionHandle {
    /// Feeds one arrived event into the session.
    ///
    /// The call only enqueues a message for the scheduler loop and never
    /// blocks, so it is safe to invoke from a delivery callback. An `Err`
    /// means the session has already shut down.
    pub fn notify_arrival(
        &self,
        identifier: EventId,
        send_time: SendTime,
    ) -> Result<(), NotifyError> {
        self.driver_tx
            .send(DriverNotification::Arrival(identifier, send_time))
            .map_err(|_| NotifyError::Disconnected)
    }

    /// Waits for the associated session to finish.
    pub fn join(self) -> Result<(), String> {
        match self.thread_handle {
            Some(thread_handle) => thread_handle.join().map_err(|e| format!("{:?}", e)),
            None => Ok(()),
        }
    }

    /// Shuts the session down and blocks until its thread exits.
    ///
    /// Any timer that is still outstanding is cancelled; queued events that
    /// were not drained yet are discarded.
    pub fn shutdown(self) -> Result<(), String> {
        // Error indicates the session is already shutting down.
        self.driver_tx.send(DriverNotification::Shutdown).ok();
        self.join()
    }
}
