//! End message parsing.
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Discriminant (0x39) |
//! | 1 | 1 | u8 | Win condition |

use crate::binary::read_u8;
use crate::error::Result;
use crate::format::{MessageType, BODY_OFFSET};

/// A decoded End message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndMessage {
    /// Win condition code reported by the game.
    pub win_condition: u8,
}

impl EndMessage {
    /// Parses an End payload.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedMessage` if the win condition is missing.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut offset = BODY_OFFSET;
        Ok(EndMessage {
            win_condition: read_u8(payload, &mut offset)?,
        })
    }

    /// Encodes this message, discriminant included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        vec![MessageType::End.code(), self.win_condition]
    }
}
