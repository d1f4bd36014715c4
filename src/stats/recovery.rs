//! Recovery tracking.
//!
//! Exactly one transition fires per frame, checked in priority order:
//!
//! | Branch | Condition | Effect |
//! |--------|-----------|--------|
//! | a | idle, in hitstun, off-stage | mark hit off-stage |
//! | b | hit off-stage, out of hitstun, off-stage | start recovering |
//! | c | not landed, hit off-stage or recovering, grounded control | mark landed |
//! | d | landed, off-stage | clear landed |
//! | e | landed, on-stage, not hit or grabbed | count; past threshold record success |
//! | f | recovering, stock lost | record failure |

use tracing::debug;

use crate::animation::{is_damaged, is_grabbed, is_in_grounded_control};
use crate::geometry::{is_off_stage, Stage};
use crate::model::{Player, Recovery};

/// Advances `player`'s recovery state for one frame.
pub(crate) fn update(player: &mut Player, stage: Stage, frame: u32, landed_threshold: u32) {
    let current = *player.current();
    let previous = *player.previous();
    let lost_stock = player.lost_stock();

    let off_stage = is_off_stage(stage, current.location_x, current.location_y);
    let damaged = is_damaged(current.animation);
    let grabbed = is_grabbed(current.animation);

    let flags = &mut player.flags;

    if !flags.is_recovering && !flags.is_hit_off_stage && damaged && off_stage {
        flags.is_hit_off_stage = true;
    } else if !flags.is_recovering && flags.is_hit_off_stage && !damaged && off_stage {
        flags.is_recovering = true;
        flags.recovery_start_frame = frame;
        flags.recovery_start_percent = previous.percent;
    } else if !flags.is_landed_on_stage
        && (flags.is_recovering || flags.is_hit_off_stage)
        && is_in_grounded_control(current.animation)
    {
        flags.is_landed_on_stage = true;
    } else if flags.is_landed_on_stage && off_stage {
        flags.frames_since_landing = 0;
        flags.is_landed_on_stage = false;
    } else if flags.is_landed_on_stage && !damaged && !grabbed {
        flags.frames_since_landing += 1;
        if flags.frames_since_landing > landed_threshold {
            if flags.is_recovering {
                finish(player, true, frame, previous.percent);
            }
            player.flags.reset_recovery();
        }
    } else if flags.is_recovering && lost_stock {
        finish(player, false, frame, previous.percent);
        player.flags.reset_recovery();
    }
}

fn finish(player: &mut Player, is_successful: bool, end_frame: u32, end_percent: f32) {
    let recovery = Recovery {
        is_successful,
        start_frame: player.flags.recovery_start_frame,
        end_frame,
        start_percent: player.flags.recovery_start_percent,
        end_percent,
    };
    debug!(
        port = player.controller_port(),
        is_successful,
        damage = recovery.damage(),
        "recovery finished"
    );
    player.stats.add_recovery(recovery);
}
