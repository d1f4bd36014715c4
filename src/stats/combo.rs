//! Combo-string tracking from the attacker's side.
//!
//! A string opens on the first damaging hit that leaves the opponent in
//! hitstun or a grab, and ends when either player loses a stock or the
//! opponent has been out of hitstun, grabs and techs for longer than the
//! configured timeout.

use tracing::debug;

use crate::animation::{is_damaged, is_grabbed, is_teching};
use crate::model::Player;

/// Advances `player`'s combo-string state against `opponent`.
///
/// Returns `true` when a new string was opened this frame.
pub(crate) fn update(player: &mut Player, opponent: &Player, frame: u32, timeout: u32) -> bool {
    let opp_current = *opponent.current();
    let opp_previous = *opponent.previous();

    let took_damage = opp_current.percent > opp_previous.percent;
    let damaged = is_damaged(opp_current.animation);
    let grabbed = is_grabbed(opp_current.animation);
    let teching = is_teching(opp_current.animation);

    let flags = &mut player.flags;
    let stats = &mut player.stats;
    let mut opened = false;

    if took_damage && (damaged || grabbed) {
        if flags.string_hit_count == 0 {
            flags.string_start_frame = frame;
            flags.string_start_percent = opp_previous.percent;
            stats.open_combo_string(frame, opp_previous.percent);
            opened = true;
        }
        flags.string_hit_count = flags.string_hit_count.saturating_add(1);
        stats.set_combo_hits(flags.string_hit_count);
    }

    if damaged || grabbed || teching {
        flags.string_reset_counter = 0;
    } else if flags.is_in_combo_string() {
        flags.string_reset_counter += 1;
    }

    let stock_lost = opponent.lost_stock() || player.lost_stock();
    let timed_out = player.flags.string_reset_counter > timeout;
    if player.flags.is_in_combo_string() && (stock_lost || timed_out) {
        if let Some(finished) = player.stats.finish_combo_string(frame, opp_previous.percent) {
            debug!(
                port = player.controller_port(),
                hits = finished.hit_count,
                damage = finished.damage(),
                "combo string finished"
            );
        }
        player.flags.reset_combo();
    }

    opened
}
