//! # Error Types
//!
//! Errors surfaced by the session, from fatal transport conditions to
//! construction-time validation of identities and topics.

use core::fmt;

/// The primary error enum for the session.
///
/// Any `Err` returned by [`Session::advance`](crate::Session::advance) is the
/// signal for the driver loop to exit permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The transport refused a subscribe because its outbound command queue was full.
    ///
    /// Retrying cannot succeed without something external draining the queue,
    /// so the session stops instead.
    SubscribeQueueFull,
    /// The session already stopped after a fatal error.
    Stopped,
    /// `advance` was called before `start`.
    NotStarted,
    /// The client identity does not fit in its buffer.
    IdentityTooLong,
    /// A topic does not fit in its buffer.
    TopicTooLong,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::SubscribeQueueFull => {
                write!(f, "subscribe failed: transport command queue is full")
            }
            SessionError::Stopped => write!(f, "session is stopped"),
            SessionError::NotStarted => write!(f, "session has not been started"),
            SessionError::IdentityTooLong => write!(f, "client identity is too long"),
            SessionError::TopicTooLong => write!(f, "topic is too long"),
        }
    }
}

impl core::error::Error for SessionError {}

/// Status codes a transport may return from a fallible request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportStatus {
    /// The outbound command queue has no room for the request.
    OutQueueFull,
    /// The transport has no live connection to the broker.
    NotConnected,
    /// Any other transport failure.
    Error,
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportStatus::OutQueueFull => write!(f, "outbound queue full"),
            TransportStatus::NotConnected => write!(f, "not connected"),
            TransportStatus::Error => write!(f, "transport error"),
        }
    }
}

impl core::error::Error for TransportStatus {}

/// Failure to extract a typed field from an untyped payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// No pair with the requested key exists in the payload.
    MissingKey,
    /// The key exists but its value cannot be read as the requested type.
    BadValue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::MissingKey => write!(f, "missing key"),
            FieldError::BadValue => write!(f, "bad value"),
        }
    }
}

impl core::error::Error for FieldError {}
