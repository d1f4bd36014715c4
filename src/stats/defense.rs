//! Defensive options, shield time and damage-free streaks.

use crate::animation::{is_guarding, DefensiveOption};
use crate::model::Player;

pub(crate) fn update(player: &mut Player) {
    let current = *player.current();
    let previous = *player.previous();

    if current.animation != previous.animation {
        if let Some(option) = DefensiveOption::from_animation(current.animation) {
            player.stats.record_defensive_option(option);
        }
    }

    if is_guarding(current.animation) {
        player.stats.add_shield_frame();
    }

    if current.percent > previous.percent {
        player.flags.frames_without_damage = 0;
    } else {
        player.flags.frames_without_damage += 1;
        player
            .stats
            .observe_frames_without_damage(player.flags.frames_without_damage);
    }
}
