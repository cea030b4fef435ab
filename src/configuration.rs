use std::time::Duration;

use tracing::Level;

use crate::batch::DedupPolicy;

/// The quiet window used when none is configured explicitly.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(5000);

/// The bound applied to individual resolve and post calls when none is
/// configured explicitly.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// The configuration parameters of a coalescing [`Session`](crate::Session).
#[derive(Clone)]
pub struct Configuration {
    /// The quiet period that must elapse after the most recent arrival before
    /// the pending batch is flushed.
    pub debounce_delay: Duration,
    /// Bound on a single provider resolve call during a drain. A call that
    /// exceeds the bound is treated as if the identifier could not be
    /// resolved. `None` leaves resolve calls unbounded.
    pub resolve_timeout: Option<Duration>,
    /// Bound on a single poster call during a drain. A call that exceeds the
    /// bound is logged and skipped. `None` leaves post calls unbounded.
    pub post_timeout: Option<Duration>,
    /// How duplicate identifiers arriving before a flush are treated.
    pub dedup_policy: DedupPolicy,
    /// The number of OS threads the session's runtime will use.
    pub num_threads: usize,
    /// The logging level of the logger initialized by the session.
    /// If `None`, the session will not initialize a logger.
    /// Defaults to [`Level::DEBUG`] when compiling in debug mode,
    /// [`Level::INFO`] when compiling in release mode.
    pub logging_level: Option<Level>,
}

impl Configuration {
    /// Creates a configuration with the default quiet window and call bounds.
    pub fn new() -> Self {
        let log_level = if cfg!(debug_assertions) {
            Some(Level::DEBUG)
        } else {
            Some(Level::INFO)
        };
        Self {
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            resolve_timeout: Some(DEFAULT_CALL_TIMEOUT),
            post_timeout: Some(DEFAULT_CALL_TIMEOUT),
            dedup_policy: DedupPolicy::AllowDuplicates,
            num_threads: 2,
            logging_level: log_level,
        }
    }

    /// Creates a configuration from command line arguments.
    pub fn from_args(args: &clap::ArgMatches) -> Self {
        let delay_ms: u64 = args
            .value_of("delay")
            .unwrap()
            .parse()
            .expect("Unable to parse the flush delay");
        let num_threads = args
            .value_of("threads")
            .unwrap()
            .parse()
            .expect("Unable to parse number of runtime threads");
        let log_level = match args.occurrences_of("verbose") {
            0 => None,
            1 => Some(Level::WARN),
            2 => Some(Level::INFO),
            3 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        };

        Self {
            debounce_delay: Duration::from_millis(delay_ms),
            resolve_timeout: Some(DEFAULT_CALL_TIMEOUT),
            post_timeout: Some(DEFAULT_CALL_TIMEOUT),
            dedup_policy: DedupPolicy::AllowDuplicates,
            num_threads,
            logging_level: log_level,
        }
    }

    /// Sets the quiet period after the most recent arrival.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Bounds each provider resolve call during a drain.
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = Some(timeout);
        self
    }

    /// Bounds each poster call during a drain.
    pub fn with_post_timeout(mut self, timeout: Duration) -> Self {
        self.post_timeout = Some(timeout);
        self
    }

    /// Removes the bounds on resolve and post calls. A hang in either
    /// collaborator will then stall the drain indefinitely.
    pub fn without_call_timeouts(mut self) -> Self {
        self.resolve_timeout = None;
        self.post_timeout = None;
        self
    }

    /// Sets the treatment of duplicate identifiers arriving before a flush.
    pub fn with_dedup_policy(mut self, policy: DedupPolicy) -> Self {
        self.dedup_policy = policy;
        self
    }

    /// Sets the logging level.
    pub fn with_logging_level(mut self, level: Level) -> Self {
        self.logging_level = Some(level);
        self
    }

    /// The session will not initialize a logger if this method is called.
    pub fn disable_logger(mut self) -> Self {
        self.logging_level = None;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_window_matches_advertised_constant() {
        let config = Configuration::new();
        assert_eq!(config.debounce_delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_from_args_parses_delay_and_verbosity() {
        let args = crate::new_app("test").get_matches_from(vec!["test", "--delay", "250", "-vv"]);
        let config = Configuration::from_args(&args);
        assert_eq!(config.debounce_delay, Duration::from_millis(250));
        assert_eq!(config.logging_level, Some(Level::INFO));
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = Configuration::new()
            .with_debounce_delay(Duration::from_millis(100))
            .without_call_timeouts()
            .with_dedup_policy(DedupPolicy::CoalescePending)
            .disable_logger();
        assert_eq!(config.debounce_delay, Duration::from_millis(100));
        assert_eq!(config.resolve_timeout, None);
        assert_eq!(config.post_timeout, None);
        assert_eq!(config.dedup_policy, DedupPolicy::CoalescePending);
        assert_eq!(config.logging_level, None);
    }
}
