//! Real-time statistics engine.
//!
//! [`compute_stats`] runs once after every Update message. For each player,
//! with the other player as opponent, it performs in order:
//!
//! 1. [`actions`]: button, stick and trigger inputs
//! 2. combo strings landed on the opponent
//! 3. recovery attempts back to the stage
//! 4. stock bookkeeping
//! 5. defensive options, shield time and damage-free streaks
//! 6. position relative to the opponent and character usage
//!
//! The order matters: a frame that both finishes a combo string and a
//! recovery sees the combo string closed first.
//!
//! Statistics assume exactly two players. Other player counts still decode,
//! but no statistics are produced.

pub mod actions;
mod combo;
mod defense;
mod position;
mod recovery;
mod stocks;

use tracing::trace;

use crate::config::Config;
use crate::geometry::Stage;
use crate::model::{Match, Player};

/// Per-frame inputs shared by both players.
#[derive(Debug, Clone, Copy)]
struct FrameContext<'a> {
    stage: Stage,
    frame: u32,
    config: &'a Config,
}

/// Updates every player's flags and statistics from the latest update.
///
/// Does nothing unless the match has exactly two players.
///
/// # Example
///
/// ```
/// use melee_stats::model::{decode_start, decode_update};
/// use melee_stats::records::UpdateMessage;
/// use melee_stats::stats::compute_stats;
/// use melee_stats::{Config, PlayerFrameData};
///
/// let mut game = decode_start(&[0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0], 2)?;
/// let pressed = PlayerFrameData { physical_buttons: 0x0001, ..PlayerFrameData::default() };
/// let update = UpdateMessage {
///     frame: 1,
///     random_seed: 0,
///     players: vec![pressed, PlayerFrameData::default()],
/// };
/// decode_update(&update.to_bytes(), &mut game)?;
///
/// compute_stats(&mut game, &Config::default());
/// assert_eq!(game.players()[0].stats().action_count(), 1);
/// assert_eq!(game.players()[1].stats().action_count(), 0);
/// # Ok::<(), melee_stats::ParserError>(())
/// ```
pub fn compute_stats(game: &mut Match, config: &Config) {
    let ctx = FrameContext {
        stage: game.stage(),
        frame: game.frame_counter(),
        config,
    };

    let players = game.players_mut();
    if players.len() != 2 {
        trace!(players = players.len(), "statistics skipped");
        return;
    }

    let (first, second) = players.split_at_mut(1);
    let (first, second) = (&mut first[0], &mut second[0]);
    update_player(first, second, &ctx);
    update_player(second, first, &ctx);
}

fn update_player(player: &mut Player, opponent: &mut Player, ctx: &FrameContext<'_>) {
    let actions = actions::count_actions(player.current(), player.previous(), ctx.config);
    player.stats.add_actions(actions);

    if combo::update(player, opponent, ctx.frame, ctx.config.combo_string_timeout) {
        if let Some(stock) = opponent.stats.current_stock_mut() {
            stock.openings_allowed = stock.openings_allowed.saturating_add(1);
        }
    }

    recovery::update(player, ctx.stage, ctx.frame, ctx.config.frames_landed_recovery);
    stocks::update(player, ctx.frame);
    defense::update(player);
    position::update(player, opponent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AIR_DODGE, ROLL_FORWARD};
    use crate::model::{decode_start, decode_update, PlayerFrameData};
    use crate::records::UpdateMessage;

    const DAMAGED: u16 = 0x4B;
    const GRABBED: u16 = 0xDF;
    const STANDING: u16 = 0x0E;
    const FALLING: u16 = 0x1D;
    const DEAD: u16 = 0x02;

    /// Drives a Battlefield match one frame at a time.
    struct Harness {
        game: Match,
        config: Config,
        frame: u32,
    }

    impl Harness {
        fn new() -> Self {
            let start = [0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0];
            Harness {
                game: decode_start(&start, 2).unwrap(),
                config: Config::default(),
                frame: 0,
            }
        }

        fn step(&mut self, first: PlayerFrameData, second: PlayerFrameData) {
            self.frame += 1;
            let update = UpdateMessage {
                frame: self.frame,
                random_seed: 0,
                players: vec![first, second],
            };
            decode_update(&update.to_bytes(), &mut self.game).unwrap();
            compute_stats(&mut self.game, &self.config);
        }

        fn player(&self, index: usize) -> &Player {
            &self.game.players()[index]
        }
    }

    fn standing() -> PlayerFrameData {
        PlayerFrameData {
            animation: STANDING,
            stocks: 4,
            ..PlayerFrameData::default()
        }
    }

    fn victim(animation: u16, percent: f32) -> PlayerFrameData {
        PlayerFrameData {
            animation,
            percent,
            ..standing()
        }
    }

    fn at(animation: u16, x: f32, percent: f32, stocks: u8) -> PlayerFrameData {
        PlayerFrameData {
            animation,
            location_x: x,
            percent,
            stocks,
            ..PlayerFrameData::default()
        }
    }

    // =========================================================================
    // Combo strings
    // =========================================================================

    #[test]
    fn test_combo_string_lifecycle() {
        let mut h = Harness::new();
        h.step(standing(), victim(DAMAGED, 0.0));
        h.step(standing(), victim(DAMAGED, 10.0));
        h.step(standing(), victim(DAMAGED, 20.0));

        let current = h.player(0).stats().current_combo_string().unwrap();
        assert_eq!(current.hit_count, 2);
        assert_eq!(current.start_frame, 2);

        for _ in 0..45 {
            h.step(standing(), victim(STANDING, 20.0));
        }
        assert!(h.player(0).stats().combo_strings().is_empty());
        assert!(h.player(0).flags().is_in_combo_string());

        h.step(standing(), victim(STANDING, 20.0));

        let stats = h.player(0).stats();
        assert_eq!(stats.combo_strings().len(), 1);
        let combo = stats.combo_strings()[0];
        assert_eq!(combo.hit_count, 2);
        assert_eq!(combo.start_percent, 0.0);
        assert_eq!(combo.end_percent, 20.0);
        assert_eq!(combo.end_frame, 49);
        assert!(combo.is_finished);
        assert!(stats.current_combo_string().is_none());
        assert_eq!(stats.average_combo_string_damage(), 20.0);
        assert!(!h.player(0).flags().is_in_combo_string());

        // Opening is charged to the victim's current stock.
        assert_eq!(h.player(1).stats().stocks()[0].openings_allowed, 1);
        assert!(h.player(1).stats().combo_strings().is_empty());
    }

    #[test]
    fn test_grab_and_tech_hold_string_open() {
        let mut h = Harness::new();
        h.step(standing(), victim(STANDING, 0.0));
        h.step(standing(), victim(GRABBED, 3.0));
        for _ in 0..40 {
            h.step(standing(), victim(STANDING, 3.0));
        }
        h.step(standing(), victim(0xC7, 3.0));
        for _ in 0..40 {
            h.step(standing(), victim(STANDING, 3.0));
        }
        assert!(h.player(0).stats().combo_strings().is_empty());
        assert_eq!(h.player(0).flags().string_hit_count, 1);
    }

    #[test]
    fn test_stock_loss_ends_string() {
        let mut h = Harness::new();
        h.step(standing(), victim(STANDING, 0.0));
        h.step(standing(), victim(DAMAGED, 12.0));
        h.step(standing(), victim(DAMAGED, 30.0));
        h.step(
            standing(),
            PlayerFrameData {
                animation: DEAD,
                stocks: 3,
                ..PlayerFrameData::default()
            },
        );

        let strings = h.player(0).stats().combo_strings();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].hit_count, 2);
        assert_eq!(strings[0].end_percent, 30.0);
    }

    #[test]
    fn test_damage_outside_hitstun_is_not_a_hit() {
        let mut h = Harness::new();
        h.step(standing(), victim(STANDING, 0.0));
        h.step(standing(), victim(STANDING, 8.0));
        assert_eq!(h.player(0).stats().openings(), 0);
        assert!(!h.player(0).flags().is_in_combo_string());
    }

    // =========================================================================
    // Recoveries
    // =========================================================================

    #[test]
    fn test_successful_recovery() {
        let mut h = Harness::new();
        h.step(at(STANDING, 0.0, 40.0, 4), standing());
        h.step(at(DAMAGED, 100.0, 52.0, 4), standing());
        assert!(h.player(0).flags().is_hit_off_stage);

        h.step(at(FALLING, 95.0, 52.0, 4), standing());
        assert!(h.player(0).flags().is_recovering);
        assert_eq!(h.player(0).flags().recovery_start_frame, 3);

        h.step(at(STANDING, 60.0, 52.0, 4), standing());
        assert!(h.player(0).flags().is_landed_on_stage);

        for _ in 0..45 {
            h.step(at(STANDING, 60.0, 52.0, 4), standing());
        }
        assert!(h.player(0).stats().recoveries().is_empty());

        h.step(at(STANDING, 60.0, 52.0, 4), standing());

        let stats = h.player(0).stats();
        assert_eq!(stats.recoveries().len(), 1);
        let recovery = stats.recoveries()[0];
        assert!(recovery.is_successful);
        assert_eq!(recovery.start_frame, 3);
        assert_eq!(recovery.start_percent, 52.0);
        assert_eq!(recovery.end_percent, 52.0);
        assert_eq!(stats.successful_recoveries(), 1);
        let flags = h.player(0).flags();
        assert!(!flags.is_recovering && !flags.is_hit_off_stage && !flags.is_landed_on_stage);
        assert_eq!(flags.frames_since_landing, 0);
    }

    #[test]
    fn test_failed_recovery() {
        let mut h = Harness::new();
        h.step(at(STANDING, 0.0, 90.0, 4), standing());
        h.step(at(DAMAGED, 100.0, 110.0, 4), standing());
        h.step(at(FALLING, 110.0, 110.0, 4), standing());
        h.step(at(FALLING, 112.0, 115.0, 4), standing());
        h.step(at(DEAD, 0.0, 0.0, 3), standing());

        let stats = h.player(0).stats();
        assert_eq!(stats.recoveries().len(), 1);
        let recovery = stats.recoveries()[0];
        assert!(!recovery.is_successful);
        assert_eq!(recovery.start_percent, 110.0);
        assert_eq!(recovery.end_percent, 115.0);
        assert_eq!(recovery.end_frame, 5);
        assert_eq!(stats.average_edgeguard_damage(), 5.0);
        assert!(!h.player(0).flags().is_recovering);
    }

    #[test]
    fn test_leaving_stage_after_landing_resets_counter() {
        let mut h = Harness::new();
        h.step(at(STANDING, 0.0, 0.0, 4), standing());
        h.step(at(DAMAGED, 100.0, 10.0, 4), standing());
        h.step(at(FALLING, 100.0, 10.0, 4), standing());
        h.step(at(STANDING, 60.0, 10.0, 4), standing());
        for _ in 0..20 {
            h.step(at(STANDING, 60.0, 10.0, 4), standing());
        }
        assert_eq!(h.player(0).flags().frames_since_landing, 20);

        h.step(at(FALLING, 100.0, 10.0, 4), standing());
        assert_eq!(h.player(0).flags().frames_since_landing, 0);
        assert!(!h.player(0).flags().is_landed_on_stage);
        assert!(h.player(0).flags().is_recovering);
    }

    // =========================================================================
    // Stocks and defense
    // =========================================================================

    #[test]
    fn test_stock_loss_recorded() {
        let mut h = Harness::new();
        let mut hurt = at(STANDING, 0.0, 130.0, 4);
        hurt.last_hit_by = 1;
        h.step(hurt, standing());
        h.step(at(DEAD, 0.0, 0.0, 3), standing());

        let stocks = h.player(0).stats().stocks();
        assert_eq!(stocks.len(), 2);
        assert!(stocks[0].is_stock_lost);
        assert_eq!(stocks[0].frame_end, Some(2));
        assert_eq!(stocks[0].percent, 130.0);
        assert_eq!(stocks[0].last_hit_by, 1);
        assert_eq!(stocks[0].last_animation, DEAD);
        assert_eq!(stocks[1].frame_start, 2);
    }

    #[test]
    fn test_last_stock_does_not_open_another() {
        let mut h = Harness::new();
        h.step(at(STANDING, 0.0, 0.0, 1), standing());
        h.step(at(DEAD, 0.0, 0.0, 0), standing());
        assert_eq!(h.player(0).stats().stocks().len(), 1);
        assert!(h.player(0).stats().stocks()[0].is_stock_lost);
    }

    #[test]
    fn test_defensive_options_counted_on_entry() {
        let mut h = Harness::new();
        h.step(standing(), standing());
        h.step(victim(ROLL_FORWARD, 0.0), standing());
        h.step(victim(ROLL_FORWARD, 0.0), standing());
        h.step(victim(AIR_DODGE, 0.0), standing());
        h.step(victim(0xB3, 0.0), standing());
        h.step(victim(0xB3, 0.0), standing());

        let stats = h.player(0).stats();
        assert_eq!(stats.roll_count(), 1);
        assert_eq!(stats.air_dodge_count(), 1);
        assert_eq!(stats.spot_dodge_count(), 0);
        assert_eq!(stats.frames_in_shield(), 2);
    }

    #[test]
    fn test_frames_without_damage_streak() {
        let mut h = Harness::new();
        for _ in 0..10 {
            h.step(victim(STANDING, 0.0), standing());
        }
        h.step(victim(DAMAGED, 5.0), standing());
        for _ in 0..3 {
            h.step(victim(STANDING, 5.0), standing());
        }
        assert_eq!(h.player(0).flags().frames_without_damage, 3);
        assert_eq!(h.player(0).stats().most_frames_without_damage(), 10);
    }

    // =========================================================================
    // Position and character usage
    // =========================================================================

    fn placed(x: f32, y: f32) -> PlayerFrameData {
        PlayerFrameData {
            location_x: x,
            location_y: y,
            ..standing()
        }
    }

    #[test]
    fn test_position_relative_to_opponent() {
        let mut h = Harness::new();
        h.step(placed(-10.0, 30.0), placed(40.0, 0.0));
        h.step(placed(20.0, 0.0), placed(-5.0, 15.0));
        h.step(placed(30.0, 5.0), placed(-30.0, 5.0));

        let first = h.player(0).stats();
        assert_eq!(first.frames_above_opponent(), 1);
        assert_eq!(first.frames_closest_center(), 1);
        assert!((first.average_distance_from_center() - 20.0).abs() < 1e-4);

        let second = h.player(1).stats();
        assert_eq!(second.frames_above_opponent(), 1);
        assert_eq!(second.frames_closest_center(), 1);
        assert!((second.average_distance_from_center() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_character_usage_tracks_transform() {
        const ZELDA: u8 = 0x13;
        const SHEIK: u8 = 0x07;

        let mut h = Harness::new();
        let zelda = PlayerFrameData {
            internal_character_id: ZELDA,
            ..standing()
        };
        let sheik = PlayerFrameData {
            internal_character_id: SHEIK,
            ..standing()
        };
        for _ in 0..2 {
            h.step(zelda, standing());
        }
        for _ in 0..5 {
            h.step(sheik, standing());
        }

        let stats = h.player(0).stats();
        assert_eq!(stats.character_usage().get(&ZELDA), Some(&2));
        assert_eq!(stats.character_usage().get(&SHEIK), Some(&5));
        assert_eq!(stats.most_used_character(), Some(SHEIK));
        assert_eq!(h.player(1).stats().character_usage().len(), 1);
    }

    #[test]
    fn test_non_two_player_match_skips_statistics() {
        let start = [0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0, 2, 4, 0, 0];
        let mut game = decode_start(&start, 3).unwrap();
        let pressed = PlayerFrameData {
            physical_buttons: 0x00FF,
            ..PlayerFrameData::default()
        };
        let update = UpdateMessage {
            frame: 1,
            random_seed: 0,
            players: vec![pressed; 3],
        };
        decode_update(&update.to_bytes(), &mut game).unwrap();
        compute_stats(&mut game, &Config::default());
        assert!(game.players().iter().all(|p| p.stats().action_count() == 0));
    }
}
