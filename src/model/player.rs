//! Player state: static identity, frame snapshots, flags and statistics.

use serde::Serialize;

use super::frame::PlayerFrameData;
use super::statistics::PlayerStatistics;
use crate::records::PlayerIdentity;

/// Transient state-machine bits used by the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlayerFlags {
    /// Knocked off-stage while in hitstun.
    pub is_hit_off_stage: bool,
    /// Left hitstun while still off-stage.
    pub is_recovering: bool,
    /// Back in grounded control after being off-stage.
    pub is_landed_on_stage: bool,
    /// Frames stabilized on stage since landing.
    pub frames_since_landing: u32,
    /// Match frame the recovery began.
    pub recovery_start_frame: u32,
    /// Percent when the recovery began.
    pub recovery_start_percent: f32,

    /// Hits in the combo string in progress (0 when idle).
    pub string_hit_count: u16,
    /// Frames since the opponent was last in hitstun, grabbed or teching.
    pub string_reset_counter: u32,
    /// Match frame of the opening hit.
    pub string_start_frame: u32,
    /// Opponent percent before the opening hit.
    pub string_start_percent: f32,

    /// Consecutive frames without taking damage.
    pub frames_without_damage: u32,
}

impl PlayerFlags {
    /// Returns the recovery fields to idle.
    pub fn reset_recovery(&mut self) {
        self.is_recovering = false;
        self.is_hit_off_stage = false;
        self.is_landed_on_stage = false;
        self.frames_since_landing = 0;
    }

    /// Returns the combo-string fields to idle.
    pub fn reset_combo(&mut self) {
        self.string_hit_count = 0;
        self.string_reset_counter = 0;
    }

    /// Whether a combo string is in progress.
    #[must_use]
    pub fn is_in_combo_string(&self) -> bool {
        self.string_hit_count > 0
    }
}

/// One participant of a match.
///
/// The identity is fixed at match start. Frame data is replaced by every
/// update, with the outgoing frame kept as an independent copy in
/// [`Player::previous`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    identity: PlayerIdentity,
    current: PlayerFrameData,
    previous: PlayerFrameData,
    pub(crate) flags: PlayerFlags,
    pub(crate) stats: PlayerStatistics,
}

impl Player {
    /// Creates a player with neutral frame data.
    #[must_use]
    pub fn new(identity: PlayerIdentity) -> Self {
        Player {
            identity,
            current: PlayerFrameData::default(),
            previous: PlayerFrameData::default(),
            flags: PlayerFlags::default(),
            stats: PlayerStatistics::new(),
        }
    }

    /// Static identity from the Start message.
    #[must_use]
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Controller port.
    #[must_use]
    pub fn controller_port(&self) -> u8 {
        self.identity.controller_port
    }

    /// External character id.
    #[must_use]
    pub fn character_id(&self) -> u8 {
        self.identity.character_id
    }

    /// Frame data from the latest update.
    #[must_use]
    pub fn current(&self) -> &PlayerFrameData {
        &self.current
    }

    /// Frame data from the update before the latest.
    #[must_use]
    pub fn previous(&self) -> &PlayerFrameData {
        &self.previous
    }

    /// State-machine flags.
    #[must_use]
    pub fn flags(&self) -> &PlayerFlags {
        &self.flags
    }

    /// Aggregated statistics.
    #[must_use]
    pub fn stats(&self) -> &PlayerStatistics {
        &self.stats
    }

    /// Snapshots the current frame into previous, then installs `frame`.
    pub(crate) fn advance(&mut self, frame: PlayerFrameData) {
        self.previous = self.current;
        self.current = frame;
    }

    /// Whether this player lost a stock on the latest update.
    #[must_use]
    pub fn lost_stock(&self) -> bool {
        self.current.stocks_lost_since(&self.previous) > 0
    }
}
