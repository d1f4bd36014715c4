//! Update message parsing.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Discriminant (0x38) |
//! | 1 | 4 | u32 BE | Frame number |
//! | 5 | 4 | u32 BE | Random seed |
//! | 9 | 57×N | block | Player frame blocks (see [`PlayerFrameData`]) |
//!
//! The payload is decoded in full before anything is applied to a match, so
//! a truncated update never leaves a match half-written.

use crate::binary::{read_u32_be, write_u32_be};
use crate::error::Result;
use crate::format::{MessageType, BODY_OFFSET};
use crate::model::PlayerFrameData;

/// A decoded Update message.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMessage {
    /// Frame number reported by the device.
    pub frame: u32,
    /// Random seed for this frame.
    pub random_seed: u32,
    /// Per-player frame data in match player order.
    pub players: Vec<PlayerFrameData>,
}

impl UpdateMessage {
    /// Parses an Update payload for a match with `player_count` players.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedMessage` if any field is cut off.
    pub fn parse(payload: &[u8], player_count: usize) -> Result<Self> {
        let mut offset = BODY_OFFSET;
        let frame = read_u32_be(payload, &mut offset)?;
        let random_seed = read_u32_be(payload, &mut offset)?;

        let players = (0..player_count)
            .map(|_| PlayerFrameData::parse(payload, &mut offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(UpdateMessage {
            frame,
            random_seed,
            players,
        })
    }

    /// Encodes this message, discriminant included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MessageType::Update.payload_size(self.players.len()));
        out.push(MessageType::Update.code());
        write_u32_be(&mut out, self.frame);
        write_u32_be(&mut out, self.random_seed);
        for frame in &self.players {
            frame.write(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParserError;

    fn sample() -> UpdateMessage {
        UpdateMessage {
            frame: 1234,
            random_seed: 0xDEAD_BEEF,
            players: vec![
                PlayerFrameData {
                    animation: 0x0E,
                    percent: 12.0,
                    stocks: 4,
                    ..PlayerFrameData::default()
                },
                PlayerFrameData {
                    animation: 0x4B,
                    location_x: 80.0,
                    stocks: 3,
                    ..PlayerFrameData::default()
                },
            ],
        }
    }

    #[test]
    fn test_update_header_fields() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), MessageType::Update.payload_size(2));
        assert_eq!(bytes[0], 0x38);
        assert_eq!(&bytes[1..5], &1234u32.to_be_bytes());
        assert_eq!(&bytes[5..9], &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_update_parse_players_in_order() {
        let message = sample();
        let parsed = UpdateMessage::parse(&message.to_bytes(), 2).unwrap();
        assert_eq!(parsed.players[0].percent, 12.0);
        assert_eq!(parsed.players[1].animation, 0x4B);
        assert_eq!(parsed.players[1].location_x, 80.0);
    }

    #[test]
    fn test_update_truncated() {
        let mut bytes = sample().to_bytes();
        bytes.pop();
        assert!(matches!(
            UpdateMessage::parse(&bytes, 2),
            Err(ParserError::TruncatedMessage { .. })
        ));
    }

    #[test]
    fn test_update_header_only() {
        let bytes = [0x38, 0, 0, 0, 1];
        assert!(UpdateMessage::parse(&bytes, 2).is_err());
    }
}
