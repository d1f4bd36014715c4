//! Animation (action state) code classification.
//!
//! The game reports each character's current animation as a 16-bit code.
//! Statistics only care about a few families of codes, identified by fixed
//! numeric ranges.

use std::ops::RangeInclusive;

/// Hitstun / tumble animations.
pub const DAMAGE: RangeInclusive<u16> = 0x4B..=0x5B;

/// Being held in a grab.
pub const CAPTURE: RangeInclusive<u16> = 0xDF..=0xE8;

/// Shield animations.
pub const GUARD: RangeInclusive<u16> = 0xB2..=0xB6;

/// Standing, walking, dashing and other actionable grounded states.
pub const GROUNDED_CONTROL: RangeInclusive<u16> = 0x0E..=0x18;

/// Tech in place / tech roll animations.
pub const TECH: RangeInclusive<u16> = 0xC7..=0xCC;

/// Blast-zone death animations.
pub const DYING: RangeInclusive<u16> = 0x00..=0x0A;

/// Missed tech, landing face up.
pub const TECH_MISS_UP: u16 = 0xB7;
/// Missed tech, landing face down.
pub const TECH_MISS_DOWN: u16 = 0xBF;

/// Forward roll.
pub const ROLL_FORWARD: u16 = 0xE9;
/// Backward roll.
pub const ROLL_BACKWARD: u16 = 0xEA;
/// Spot dodge.
pub const SPOT_DODGE: u16 = 0xEB;
/// Air dodge.
pub const AIR_DODGE: u16 = 0xEC;

/// Returns whether the animation is in hitstun.
#[must_use]
pub fn is_damaged(animation: u16) -> bool {
    DAMAGE.contains(&animation)
}

/// Returns whether the animation is a grabbed state.
#[must_use]
pub fn is_grabbed(animation: u16) -> bool {
    CAPTURE.contains(&animation)
}

/// Returns whether the animation is a tech or a missed tech.
#[must_use]
pub fn is_teching(animation: u16) -> bool {
    TECH.contains(&animation) || animation == TECH_MISS_UP || animation == TECH_MISS_DOWN
}

/// Returns whether the character is actionable on the ground.
#[must_use]
pub fn is_in_grounded_control(animation: u16) -> bool {
    GROUNDED_CONTROL.contains(&animation)
}

/// Returns whether the character is shielding.
#[must_use]
pub fn is_guarding(animation: u16) -> bool {
    GUARD.contains(&animation)
}

/// Returns whether the character is in a death animation.
#[must_use]
pub fn is_dying(animation: u16) -> bool {
    DYING.contains(&animation)
}

/// Defensive options counted per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefensiveOption {
    /// Forward or backward roll.
    Roll,
    /// Spot dodge.
    SpotDodge,
    /// Air dodge.
    AirDodge,
}

impl DefensiveOption {
    /// Classifies an animation as a defensive option, if it is one.
    #[must_use]
    pub fn from_animation(animation: u16) -> Option<Self> {
        match animation {
            ROLL_FORWARD | ROLL_BACKWARD => Some(DefensiveOption::Roll),
            SPOT_DODGE => Some(DefensiveOption::SpotDodge),
            AIR_DODGE => Some(DefensiveOption::AirDodge),
            _ => None,
        }
    }
}
