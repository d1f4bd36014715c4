//! Error types for the match stream decoder.
//!
//! This module defines the error hierarchy for every failure the decoder can
//! surface to its caller: truncated payloads, unknown or out-of-order
//! messages, capture I/O failures and configuration problems. None of these
//! are fatal to other matches; the caller decides whether to drop the
//! connection.

use thiserror::Error;

/// The main error type for match stream decoding.
///
/// # Example
///
/// ```
/// use melee_stats::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::truncated(9, 5))
/// }
///
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading a capture or configuration file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A field required more bytes than the payload had left.
    ///
    /// The cursor is never advanced past the end of a payload; the message
    /// is rejected as a whole.
    #[error("Truncated message: expected {expected} bytes, but only {available} available")]
    TruncatedMessage {
        /// The payload length that would have been needed.
        expected: usize,
        /// The actual payload length.
        available: usize,
    },

    /// The discriminant byte is not Start, Update or End.
    #[error("Unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// An Update or End message arrived before any Start message.
    #[error("{message} message received before match start")]
    OutOfOrderUpdate {
        /// Name of the message that arrived out of order.
        message: &'static str,
    },

    /// A zero-length payload was delivered.
    #[error("Empty message payload")]
    EmptyMessage,

    /// A capture record declares a payload longer than any valid message.
    #[error("Invalid record length {length} at offset {offset}")]
    InvalidRecordLength {
        /// Byte offset of the record's length prefix.
        offset: usize,
        /// The declared payload length.
        length: usize,
    },

    /// The configuration could not be parsed or is inconsistent.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// A description of the configuration problem.
        reason: String,
    },
}

impl ParserError {
    /// Creates a `TruncatedMessage` error with the given sizes.
    ///
    /// # Example
    ///
    /// ```
    /// use melee_stats::error::ParserError;
    ///
    /// let err = ParserError::truncated(128, 64);
    /// assert!(err.to_string().contains("expected 128 bytes"));
    /// ```
    #[must_use]
    pub fn truncated(expected: usize, available: usize) -> Self {
        ParserError::TruncatedMessage {
            expected,
            available,
        }
    }

    /// Returns whether this error leaves the stream usable.
    ///
    /// Unknown and out-of-order messages are dropped without touching match
    /// state, so processing can continue with the next payload.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParserError::UnknownMessageType(_)
                | ParserError::OutOfOrderUpdate { .. }
                | ParserError::EmptyMessage
        )
    }
}

/// A specialized Result type for decoding operations.
pub type Result<T> = std::result::Result<T, ParserError>;
