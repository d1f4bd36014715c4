//! Start message parsing.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Discriminant (0x37) |
//! | 1 | 2 | u16 BE | Stage id |
//! | 3 | 4×N | block | Player identity blocks |
//!
//! Each player identity block is controller port, character id, player type
//! and costume color, one byte each.

use serde::Serialize;

use crate::binary::{read_u16_be, read_u8, write_u16_be};
use crate::error::Result;
use crate::format::{MessageType, BODY_OFFSET};

/// Static identity of one player, fixed for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlayerIdentity {
    /// Controller port.
    pub controller_port: u8,
    /// External character id.
    pub character_id: u8,
    /// Player type (human, CPU, ...).
    pub player_type: u8,
    /// Costume color.
    pub character_color: u8,
}

/// A decoded Start message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMessage {
    /// Stage id.
    pub stage: u16,
    /// Player identities in wire order.
    pub players: Vec<PlayerIdentity>,
}

impl StartMessage {
    /// Parses a Start payload for a match with `player_count` players.
    ///
    /// The discriminant byte is skipped, not validated.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedMessage` if the payload is too short.
    ///
    /// # Example
    ///
    /// ```
    /// use melee_stats::records::StartMessage;
    ///
    /// let payload = [0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0];
    /// let start = StartMessage::parse(&payload, 2).unwrap();
    /// assert_eq!(start.stage, 31);
    /// assert_eq!(start.players[1].character_id, 9);
    /// ```
    pub fn parse(payload: &[u8], player_count: usize) -> Result<Self> {
        let mut offset = BODY_OFFSET;
        let stage = read_u16_be(payload, &mut offset)?;

        let players = (0..player_count)
            .map(|_| {
                Ok(PlayerIdentity {
                    controller_port: read_u8(payload, &mut offset)?,
                    character_id: read_u8(payload, &mut offset)?,
                    player_type: read_u8(payload, &mut offset)?,
                    character_color: read_u8(payload, &mut offset)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StartMessage { stage, players })
    }

    /// Encodes this message, discriminant included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MessageType::Start.payload_size(self.players.len()));
        out.push(MessageType::Start.code());
        write_u16_be(&mut out, self.stage);
        for p in &self.players {
            out.extend_from_slice(&[
                p.controller_port,
                p.character_id,
                p.player_type,
                p.character_color,
            ]);
        }
        out
    }
}
