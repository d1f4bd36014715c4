//! Stage position relative to the opponent and character usage.
//!
//! Being higher than the opponent is counted as the worse position; being
//! closer to the stage center (x = 0) as controlling the stage. Ties count
//! for neither player.

use crate::model::Player;

pub(crate) fn update(player: &mut Player, opponent: &Player) {
    let current = *player.current();
    let other = opponent.current();

    let distance = current.location_x.abs();
    player.stats.observe_position(
        current.location_y > other.location_y,
        distance < other.location_x.abs(),
        distance,
    );

    // Sheik and Zelda swap internal ids mid-match.
    player
        .stats
        .add_character_frame(current.internal_character_id);
}
