//! Sink configuration.
//!
//! ```ignore
//! let config = SinkConfig::new("broker.local", 8883, "telemetry/", "sensor-1")
//!     .with_tls(true)
//!     .with_sat_file("/var/run/secrets/mqtt/token")
//!     .with_replacements(&[StringReplacement::new("/", "-")])
//!     .with_max_backoff(Duration::from_secs(5));
//! ```

use embassy_time::Duration;

use crate::topic::StringReplacement;

/// Delay before the first retry of a failed publish.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound for the delay between retries.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(10_000);

/// Construction parameters of a [`ReliablePublisher`](crate::ReliablePublisher).
#[derive(Debug, Clone, Copy)]
pub struct SinkConfig<'a> {
    pub host: &'a str,
    pub port: u16,
    /// A random UUID is generated when `None`.
    pub client_id: Option<&'a str>,
    pub use_tls: bool,
    pub username: Option<&'a str>,
    pub password_file: Option<&'a str>,
    /// Short-lived access token file.
    pub sat_file: Option<&'a str>,
    pub ca_file: Option<&'a str>,
    pub base_topic: &'a str,
    pub source_id: &'a str,
    pub replacements: &'a [StringReplacement<'a>],
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl<'a> SinkConfig<'a> {
    pub fn new(host: &'a str, port: u16, base_topic: &'a str, source_id: &'a str) -> Self {
        Self {
            host,
            port,
            client_id: None,
            use_tls: false,
            username: None,
            password_file: None,
            sat_file: None,
            ca_file: None,
            base_topic,
            source_id,
            replacements: &[],
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    pub fn with_client_id(mut self, client_id: &'a str) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_username(mut self, username: &'a str) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_password_file(mut self, path: &'a str) -> Self {
        self.password_file = Some(path);
        self
    }

    pub fn with_sat_file(mut self, path: &'a str) -> Self {
        self.sat_file = Some(path);
        self
    }

    pub fn with_ca_file(mut self, path: &'a str) -> Self {
        self.ca_file = Some(path);
        self
    }

    pub fn with_replacements(mut self, replacements: &'a [StringReplacement<'a>]) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }
}
