//! # Reliable MQTT Publish Sink for Embedded Systems
//!
//! `myrtio-mqtt-sink` delivers serialized documents of a data source to an MQTT
//! broker with at-least-once semantics. It is `no_std` and allocation-free,
//! built for the [Embassy](https://embassy.dev/) async ecosystem but usable
//! with any executor.
//!
//! ## Core Features
//!
//! - **Per-source topics:** every source publishes under
//!   `<base topic><sha256(source id)>/<sanitized source id>`, computed once.
//! - **Retry until acknowledged:** communication failures trigger a backoff
//!   wait (`delay^1.02`, capped) and a reconnect, then the publish is retried.
//!   Messages are never dropped; duplicates are possible.
//! - **Cancellable:** every push takes a cancellation future that is observed
//!   during publishes, backoff waits and reconnects.
//! - **Session Agnostic:** the broker session (connection, TLS, credentials,
//!   keepalive) sits behind the `SessionClient` trait.
//!
//! ## Usage
//!
//! ```ignore
//! let config = SinkConfig::new("broker.local", 1883, "telemetry/", "sensor-1")
//!     .with_replacements(&[StringReplacement::new("/", "-")]);
//! let mut sink = ReliablePublisher::new(session, embassy_time::Delay, config, &mut rng)?;
//!
//! sink.connect().await?;
//! sink.push_data(br#"{"temperature":21.5}"#, STOP.wait()).await?;
//! ```
//!
//! Producers in other tasks can share one sink through a [`SinkHandle`] and a
//! worker running [`ReliablePublisher::run`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod backoff;
pub mod config;
pub mod error;
pub mod queue;
pub mod session;
pub mod sink;
pub mod topic;

// Re-export key types for easier access at the crate root.
pub use config::SinkConfig;
pub use error::{ConfigError, ConnectReasonCode, ErrorKind, SessionError, SinkError};
pub use queue::{SinkHandle, SinkRequest, SinkRequestChannel};
pub use session::{ConnectionSettings, PublishMessage, QoS, SessionClient, UserProperty};
pub use sink::ReliablePublisher;
pub use topic::{StringReplacement, derive_topic};
