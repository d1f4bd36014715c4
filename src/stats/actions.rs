//! Action counting.
//!
//! An action is any deliberate input change between two frames:
//!
//! - a physical button going from released to pressed (low 12 bits only)
//! - the main stick or c-stick entering a new non-neutral octant
//! - an analog trigger crossing the press threshold upwards

use crate::config::Config;
use crate::geometry::{classify_stick_with, Octant};
use crate::model::PlayerFrameData;

/// Physical buttons that count as actions.
pub const PHYSICAL_BUTTON_MASK: u16 = 0x0FFF;

/// Counts the actions performed between `previous` and `current`.
///
/// # Example
///
/// ```
/// use melee_stats::stats::actions::count_actions;
/// use melee_stats::{Config, PlayerFrameData};
///
/// let previous = PlayerFrameData::default();
/// let current = PlayerFrameData {
///     physical_buttons: 0b0101,
///     ..PlayerFrameData::default()
/// };
/// assert_eq!(count_actions(&current, &previous, &Config::default()), 2);
/// ```
#[must_use]
pub fn count_actions(
    current: &PlayerFrameData,
    previous: &PlayerFrameData,
    config: &Config,
) -> u32 {
    let pressed = !previous.physical_buttons & current.physical_buttons & PHYSICAL_BUTTON_MASK;
    let mut count = pressed.count_ones();

    let deadzone = config.stick_deadzone;
    let stick_moved = |cur: (f32, f32), prev: (f32, f32)| {
        let new = classify_stick_with(cur.0, cur.1, deadzone);
        new != Octant::DeadZone && new != classify_stick_with(prev.0, prev.1, deadzone)
    };

    if stick_moved(
        (current.joystick_x, current.joystick_y),
        (previous.joystick_x, previous.joystick_y),
    ) {
        count += 1;
    }
    if stick_moved(
        (current.cstick_x, current.cstick_y),
        (previous.cstick_x, previous.cstick_y),
    ) {
        count += 1;
    }

    let threshold = config.trigger_threshold;
    let crossed = |cur: f32, prev: f32| f64::from(prev) < threshold && f64::from(cur) >= threshold;

    if crossed(current.l_trigger, previous.l_trigger) {
        count += 1;
    }
    if crossed(current.r_trigger, previous.r_trigger) {
        count += 1;
    }

    count
}
