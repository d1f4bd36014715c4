//! The match object and the three decode entry points.
//!
//! A match is built by [`decode_start`], advanced by [`decode_update`] once
//! per frame and closed by [`decode_end`]. Every decoded payload is appended
//! to the match's raw log as a length-prefixed record.

use tracing::{debug, warn};

use super::player::Player;
use crate::capture::append_record;
use crate::error::Result;
use crate::geometry::Stage;
use crate::records::{EndMessage, StartMessage, UpdateMessage};

/// Complete state of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    stage: u16,
    frame_counter: u32,
    frames_missed: u32,
    update_count: u32,
    random_seed: u32,
    win_condition: Option<u8>,
    players: Vec<Player>,
    raw_log: Vec<u8>,
}

impl Match {
    /// Stage id from the Start message.
    #[must_use]
    pub fn stage_id(&self) -> u16 {
        self.stage
    }

    /// Stage with boundary data, if mapped.
    #[must_use]
    pub fn stage(&self) -> Stage {
        Stage::from_id(self.stage)
    }

    /// Latest frame number received.
    #[must_use]
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    /// Frames skipped by the device, accumulated over the match.
    #[must_use]
    pub fn frames_missed(&self) -> u32 {
        self.frames_missed
    }

    /// Number of Update messages applied.
    #[must_use]
    pub fn update_count(&self) -> u32 {
        self.update_count
    }

    /// Random seed from the latest update.
    #[must_use]
    pub fn random_seed(&self) -> u32 {
        self.random_seed
    }

    /// Win condition, once the End message has arrived.
    #[must_use]
    pub fn win_condition(&self) -> Option<u8> {
        self.win_condition
    }

    /// Whether the End message has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.win_condition.is_some()
    }

    /// Players in wire order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Every payload decoded so far, each with a 4-byte big-endian length
    /// prefix.
    #[must_use]
    pub fn raw_log(&self) -> &[u8] {
        &self.raw_log
    }

    /// Applies a decoded update. `payload` is the raw message for the log.
    fn apply_update(&mut self, message: UpdateMessage, payload: &[u8]) {
        append_record(&mut self.raw_log, payload);

        if self.update_count == 0 {
            self.frame_counter = message.frame;
        } else if message.frame > self.frame_counter {
            let missed = message.frame - self.frame_counter - 1;
            if missed > 0 {
                debug!(missed, frame = message.frame, "frames skipped");
            }
            self.frames_missed = self.frames_missed.saturating_add(missed);
            self.frame_counter = message.frame;
        } else {
            warn!(
                frame = message.frame,
                counter = self.frame_counter,
                "non-increasing frame number"
            );
        }

        self.update_count = self.update_count.saturating_add(1);
        self.random_seed = message.random_seed;

        for (player, frame) in self.players.iter_mut().zip(message.players) {
            player.advance(frame);
        }
    }
}

/// Decodes a Start payload into a fresh match with `player_count` players.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if the payload is too short.
///
/// # Example
///
/// ```
/// use melee_stats::model::decode_start;
///
/// let payload = [0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0];
/// let game = decode_start(&payload, 2).unwrap();
/// assert_eq!(game.stage_id(), 31);
/// assert_eq!(game.players().len(), 2);
/// assert_eq!(game.frame_counter(), 0);
/// ```
pub fn decode_start(payload: &[u8], player_count: usize) -> Result<Match> {
    let start = StartMessage::parse(payload, player_count)?;

    let mut raw_log = Vec::new();
    append_record(&mut raw_log, payload);

    Ok(Match {
        stage: start.stage,
        frame_counter: 0,
        frames_missed: 0,
        update_count: 0,
        random_seed: 0,
        win_condition: None,
        players: start.players.into_iter().map(Player::new).collect(),
        raw_log,
    })
}

/// Decodes an Update payload into `game`.
///
/// Each player's current frame becomes its previous frame before the new
/// data is installed. The first update sets the frame baseline; later gaps
/// in frame numbers accumulate in [`Match::frames_missed`]. A frame number
/// that does not increase adds no missed frames and leaves the counter
/// where it is.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if the payload is too short; the
/// match is left untouched in that case.
pub fn decode_update(payload: &[u8], game: &mut Match) -> Result<()> {
    let message = UpdateMessage::parse(payload, game.players.len())?;
    game.apply_update(message, payload);
    Ok(())
}

/// Decodes an End payload into `game`.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if the win condition is missing.
pub fn decode_end(payload: &[u8], game: &mut Match) -> Result<()> {
    let end = EndMessage::parse(payload)?;
    append_record(&mut game.raw_log, payload);
    game.win_condition = Some(end.win_condition);
    Ok(())
}
