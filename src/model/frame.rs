//! Per-frame volatile player state.
//!
//! # Format
//!
//! One player block inside an Update message (57 bytes, big-endian):
//!
//! | Size | Type | Field |
//! |------|------|-------|
//! | 1 | u8 | Internal character id |
//! | 2 | u16 | Animation state |
//! | 4 | f32 | Location X |
//! | 4 | f32 | Location Y |
//! | 4 | f32 | Joystick X |
//! | 4 | f32 | Joystick Y |
//! | 4 | f32 | C-stick X |
//! | 4 | f32 | C-stick Y |
//! | 4 | f32 | Analog trigger |
//! | 4 | u32 | Processed buttons |
//! | 4 | f32 | Percent |
//! | 4 | f32 | Shield size |
//! | 1 | u8 | Last move hit id |
//! | 1 | u8 | Combo count |
//! | 1 | u8 | Last hit by |
//! | 1 | u8 | Stocks |
//! | 2 | u16 | Physical buttons |
//! | 4 | f32 | Left trigger (raw) |
//! | 4 | f32 | Right trigger (raw) |

use serde::Serialize;

use crate::binary::{
    read_f32_be, read_u16_be, read_u32_be, read_u8, write_f32_be, write_u16_be, write_u32_be,
};
use crate::error::Result;

/// Volatile state of one player for one frame.
///
/// Replaced wholesale by every Update message. The value is `Copy`, so the
/// previous frame is always an independent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlayerFrameData {
    /// Internal character id (differs from the external id for transforms).
    pub internal_character_id: u8,
    /// Animation (action state) code.
    pub animation: u16,
    /// World position X.
    pub location_x: f32,
    /// World position Y.
    pub location_y: f32,
    /// Processed main stick X in [-1, 1].
    pub joystick_x: f32,
    /// Processed main stick Y in [-1, 1].
    pub joystick_y: f32,
    /// Processed c-stick X in [-1, 1].
    pub cstick_x: f32,
    /// Processed c-stick Y in [-1, 1].
    pub cstick_y: f32,
    /// Processed analog trigger.
    pub trigger: f32,
    /// Processed button bitmask. Some physical buttons set several bits.
    pub buttons: u32,
    /// Damage percent.
    pub percent: f32,
    /// Shield size.
    pub shield_size: f32,
    /// Id of the last move that connected.
    pub last_move_hit_id: u8,
    /// In-game combo counter.
    pub combo_count: u8,
    /// Port of the player that last hit this one.
    pub last_hit_by: u8,
    /// Remaining stocks.
    pub stocks: u8,
    /// Raw button bitmask, one bit per physical button.
    pub physical_buttons: u16,
    /// Raw left trigger.
    pub l_trigger: f32,
    /// Raw right trigger.
    pub r_trigger: f32,
}

impl PlayerFrameData {
    /// Reads one player block at the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedMessage` if the block is incomplete.
    pub fn parse(bytes: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(PlayerFrameData {
            internal_character_id: read_u8(bytes, offset)?,
            animation: read_u16_be(bytes, offset)?,
            location_x: read_f32_be(bytes, offset)?,
            location_y: read_f32_be(bytes, offset)?,
            joystick_x: read_f32_be(bytes, offset)?,
            joystick_y: read_f32_be(bytes, offset)?,
            cstick_x: read_f32_be(bytes, offset)?,
            cstick_y: read_f32_be(bytes, offset)?,
            trigger: read_f32_be(bytes, offset)?,
            buttons: read_u32_be(bytes, offset)?,
            percent: read_f32_be(bytes, offset)?,
            shield_size: read_f32_be(bytes, offset)?,
            last_move_hit_id: read_u8(bytes, offset)?,
            combo_count: read_u8(bytes, offset)?,
            last_hit_by: read_u8(bytes, offset)?,
            stocks: read_u8(bytes, offset)?,
            physical_buttons: read_u16_be(bytes, offset)?,
            l_trigger: read_f32_be(bytes, offset)?,
            r_trigger: read_f32_be(bytes, offset)?,
        })
    }

    /// Appends this block in wire order.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.internal_character_id);
        write_u16_be(out, self.animation);
        write_f32_be(out, self.location_x);
        write_f32_be(out, self.location_y);
        write_f32_be(out, self.joystick_x);
        write_f32_be(out, self.joystick_y);
        write_f32_be(out, self.cstick_x);
        write_f32_be(out, self.cstick_y);
        write_f32_be(out, self.trigger);
        write_u32_be(out, self.buttons);
        write_f32_be(out, self.percent);
        write_f32_be(out, self.shield_size);
        out.push(self.last_move_hit_id);
        out.push(self.combo_count);
        out.push(self.last_hit_by);
        out.push(self.stocks);
        write_u16_be(out, self.physical_buttons);
        write_f32_be(out, self.l_trigger);
        write_f32_be(out, self.r_trigger);
    }

    /// Returns how many stocks were lost going from `previous` to `self`.
    #[must_use]
    pub fn stocks_lost_since(&self, previous: &PlayerFrameData) -> u8 {
        previous.stocks.saturating_sub(self.stocks)
    }
}
