//! Per-stock bookkeeping.

use tracing::info;

use crate::model::{Player, StockStatistics};

/// Closes the current stock if `player` lost one this frame.
///
/// Percent and attacker come from the last frame before the loss; the
/// animation is the one the player died in.
pub(crate) fn update(player: &mut Player, frame: u32) {
    if !player.lost_stock() {
        return;
    }

    let current = *player.current();
    let previous = *player.previous();

    info!(
        port = player.controller_port(),
        frame,
        percent = previous.percent,
        remaining = current.stocks,
        "stock lost"
    );

    player.stats.lose_stock(
        StockStatistics {
            frame_end: Some(frame),
            percent: previous.percent,
            last_hit_by: previous.last_hit_by,
            last_animation: current.animation,
            ..StockStatistics::default()
        },
        current.stocks > 0,
    );
}
