//! Message type detection and wire-size constants.
//!
//! Every payload delivered by the transport starts with a one-byte
//! discriminant identifying the message:
//!
//! | Code | Message | Body |
//! |------|---------|------|
//! | 0x37 | Start   | stage + one static block per player |
//! | 0x38 | Update  | frame number, seed + one frame block per player |
//! | 0x39 | End     | win condition |
//!
//! Message bodies are read starting at payload offset 1.
//!
//! # Example
//!
//! ```
//! use melee_stats::format::{detect_message_type, MessageType};
//!
//! assert!(matches!(detect_message_type(&[0x38, 0x00]), Ok(MessageType::Update)));
//! assert!(detect_message_type(&[0x10]).is_err());
//! ```

use crate::error::{ParserError, Result};

/// Offset of the first body byte; byte 0 is the discriminant.
pub const BODY_OFFSET: usize = 1;

/// Default number of players in a match.
pub const DEFAULT_PLAYER_COUNT: usize = 2;

/// Bytes per player in a Start message body.
pub const START_PLAYER_BLOCK_SIZE: usize = 4;

/// Bytes per player in an Update message body.
pub const UPDATE_PLAYER_BLOCK_SIZE: usize = 57;

/// Bytes of frame number and random seed at the head of an Update body.
pub const UPDATE_HEADER_SIZE: usize = 8;

/// Size of the big-endian length prefix on raw-log records.
pub const RECORD_LENGTH_PREFIX_SIZE: usize = 4;

/// The kind of a match stream message, taken from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Match start: stage and static player identities.
    Start,
    /// Per-frame state for every player.
    Update,
    /// Match end: win condition.
    End,
}

impl MessageType {
    /// Returns the wire discriminant for this message type.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            MessageType::Start => 0x37,
            MessageType::Update => 0x38,
            MessageType::End => 0x39,
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MessageType::Start => "Start",
            MessageType::Update => "Update",
            MessageType::End => "End",
        }
    }

    /// Returns the exact payload length (discriminant included) for a match
    /// with `player_count` players.
    #[must_use]
    pub const fn payload_size(self, player_count: usize) -> usize {
        match self {
            MessageType::Start => BODY_OFFSET + 2 + START_PLAYER_BLOCK_SIZE * player_count,
            MessageType::Update => {
                BODY_OFFSET + UPDATE_HEADER_SIZE + UPDATE_PLAYER_BLOCK_SIZE * player_count
            }
            MessageType::End => BODY_OFFSET + 1,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ParserError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x37 => Ok(MessageType::Start),
            0x38 => Ok(MessageType::Update),
            0x39 => Ok(MessageType::End),
            other => Err(ParserError::UnknownMessageType(other)),
        }
    }
}

/// Detects the message type of a payload from its discriminant byte.
///
/// # Errors
///
/// - `ParserError::EmptyMessage` if the payload is empty
/// - `ParserError::UnknownMessageType` if the discriminant is not recognized
pub fn detect_message_type(payload: &[u8]) -> Result<MessageType> {
    let &code = payload.first().ok_or(ParserError::EmptyMessage)?;
    MessageType::try_from(code)
}
