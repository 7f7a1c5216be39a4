//! # Error Types
//!
//! This module defines the error types used throughout the sink, from
//! configuration problems caught at construction time to failures reported by
//! the broker session while connecting or publishing.

use core::fmt;

/// Represents the reason codes returned by the broker for a connection attempt (`CONNACK`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectReasonCode {
    /// The connection was accepted.
    Success,
    /// The broker does not support the requested MQTT protocol version.
    UnacceptableProtocolVersion,
    /// The client identifier is not valid.
    IdentifierRejected,
    /// The broker is unavailable.
    ServerUnavailable,
    /// The username or password is not valid.
    BadUserNameOrPassword,
    /// The client is not authorized to connect.
    NotAuthorized,
    /// Any other code reported by the broker.
    Other(u8),
}

impl From<u8> for ConnectReasonCode {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::Success,
            1 => Self::UnacceptableProtocolVersion,
            2 => Self::IdentifierRejected,
            3 => Self::ServerUnavailable,
            4 => Self::BadUserNameOrPassword,
            5 => Self::NotAuthorized,
            _ => Self::Other(val),
        }
    }
}

/// Coarse classification of a session error.
///
/// Only [`ErrorKind::Communication`] is considered transient by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The broker is unreachable or the session was disrupted at the protocol level.
    Communication,
    /// Anything else, such as a payload the broker rejects.
    Other,
}

/// A marker trait for errors produced by a [`SessionClient`](crate::SessionClient).
///
/// Implementations tell the sink whether a failure is worth a reconnect.
pub trait SessionError: fmt::Debug {
    /// Classifies this error.
    fn kind(&self) -> ErrorKind;
}

/// Errors detected while building a sink from its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A topic replacement rule has an empty search value.
    EmptyReplacement,
    /// The derived topic does not fit into the topic buffer.
    TopicTooLong,
    /// The client id does not fit into the client id buffer.
    ClientIdTooLong,
    /// The sink identifier does not fit into the id buffer.
    IdTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyReplacement => f.write_str("topic replacement with an empty search value"),
            Self::TopicTooLong => f.write_str("derived topic is too long"),
            Self::ClientIdTooLong => f.write_str("client id is too long"),
            Self::IdTooLong => f.write_str("sink id is too long"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// The primary error enum for sink operations.
///
/// It is generic over the session error type `E`, wrapping whatever the
/// underlying session client reports.
#[derive(Debug)]
pub enum SinkError<E> {
    /// A non-transient error reported by the session client.
    Session(E),
    /// The broker refused the connection. The enclosed code provides the reason.
    ConnectionRefused(ConnectReasonCode),
    /// The operation was cancelled before the broker acknowledged the message.
    Cancelled,
}

impl<E: fmt::Debug> fmt::Display for SinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(err) => write!(f, "session error: {err:?}"),
            Self::ConnectionRefused(code) => {
                write!(f, "failed to connect to the MQTT broker, code {code:?}")
            }
            Self::Cancelled => f.write_str("operation cancelled"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for SinkError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_code_from_u8() {
        assert_eq!(ConnectReasonCode::from(0), ConnectReasonCode::Success);
        assert_eq!(ConnectReasonCode::from(5), ConnectReasonCode::NotAuthorized);
        assert_eq!(ConnectReasonCode::from(0x87), ConnectReasonCode::Other(0x87));
    }
}
