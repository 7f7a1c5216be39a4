//! # Broker Session Abstraction
//!
//! This module defines the `SessionClient` trait, which abstracts the persistent
//! broker session (connection, authentication, keepalive, TLS and credential
//! loading) the sink publishes through. The sink itself never touches the wire.
//!
//! With the Rust 2024 Edition, this trait uses native `async fn`, removing the
//! need for the `#[async_trait]` macro.

use crate::error::{ConnectReasonCode, SessionError};

/// Name of the user property that binds every published message to its data source.
pub const SOURCE_ID_PROPERTY: &str = "connector-source-id";

/// Represents the Quality of Service (QoS) levels for MQTT messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// A single MQTT v5 user property (a key/value string pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProperty<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> UserProperty<'a> {
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// An application message handed to the session client for publishing.
#[derive(Debug, Clone, Copy)]
pub struct PublishMessage<'m> {
    /// The topic to publish to
    pub topic: &'m str,
    /// Quality of Service level
    pub qos: QoS,
    /// The raw payload bytes, forwarded unmodified
    pub payload: &'m [u8],
    /// User properties attached to the message
    pub user_properties: &'m [UserProperty<'m>],
}

/// Everything the session client needs to open a broker session.
///
/// Credential files are passed as locations only; reading them is up to the
/// session client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings<'a> {
    pub host: &'a str,
    pub port: u16,
    pub client_id: &'a str,
    pub use_tls: bool,
    pub username: Option<&'a str>,
    pub password_file: Option<&'a str>,
    /// Short-lived access token file.
    pub sat_file: Option<&'a str>,
    pub ca_file: Option<&'a str>,
}

/// A trait representing a persistent broker session.
#[allow(async_fn_in_trait)]
pub trait SessionClient {
    /// The error type returned by the session.
    type Error: SessionError;

    /// Opens the session and returns the broker's answer.
    async fn connect(
        &mut self,
        settings: &ConnectionSettings<'_>,
    ) -> Result<ConnectReasonCode, Self::Error>;

    /// Whether the session is currently connected.
    fn is_connected(&self) -> bool;

    /// Publishes a message and resolves once the broker acknowledged it
    /// according to the message's QoS.
    async fn publish(&mut self, message: &PublishMessage<'_>) -> Result<(), Self::Error>;

    /// Re-establishes the session after a communication failure.
    ///
    /// The sink treats this as best effort; the next publish attempt is the
    /// actual health check.
    async fn reconnect(&mut self) -> Result<(), Self::Error>;
}
