//! Serializable end-of-match summaries.
//!
//! [`MatchSummary::from_match`] flattens a [`Match`] into plain numbers for
//! JSON output. Times are reported in seconds using the configured frame
//! rate. Edgeguard figures for a player come from the opponent's
//! recoveries: every opponent recovery is a chance, every failed one a
//! conversion.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Config;
use crate::ids::{character_name, stage_name};
use crate::model::{ComboString, Match, Player, Recovery, StockStatistics};

/// One stock of one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    /// Match time the stock ended, or the match length if it did not.
    pub time_seconds: f32,
    /// Percent at the loss.
    pub percent: f32,
    /// Port of the player that last hit this one.
    pub last_hit_by: u8,
    /// Animation at the loss.
    pub last_animation: u16,
    /// Openings the opponent got during the stock.
    pub openings_allowed: u16,
    /// Whether the stock was lost.
    pub is_stock_lost: bool,
}

/// Statistics of one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    /// Controller port.
    pub port: u8,
    /// External character id.
    pub character: u8,
    /// Character display name, if the id is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<&'static str>,
    /// Costume color.
    pub color: u8,
    /// Player type (human, CPU, ...).
    pub player_type: u8,
    /// Stocks left at the last frame.
    pub stocks_remaining: u8,
    /// Total counted actions.
    pub actions: u32,
    /// Actions per minute.
    pub apm: f32,
    /// Share of the match spent shielding, 0 to 100.
    pub percent_time_in_shield: f32,
    /// Longest stretch without taking damage.
    pub seconds_without_damage: f32,
    /// Share of the match spent higher than the opponent, 0 to 100.
    pub percent_time_above_opponent: f32,
    /// Share of the match spent closer to the stage center than the opponent, 0 to 100.
    pub percent_time_closest_center: f32,
    /// Mean horizontal distance from the stage center.
    pub average_distance_from_center: f32,
    /// Share of the match played per internal character id, 0 to 100.
    pub character_usage: BTreeMap<u8, f32>,
    /// Rolls performed.
    pub roll_count: u16,
    /// Spot dodges performed.
    pub spot_dodge_count: u16,
    /// Air dodges performed.
    pub air_dodge_count: u16,
    /// Completed recoveries.
    pub recovery_attempts: usize,
    /// Recoveries that made it back.
    pub successful_recoveries: usize,
    /// Mean damage taken while recovering.
    pub average_edgeguard_damage_taken: f32,
    /// Opponent recoveries.
    pub edgeguard_chances: usize,
    /// Opponent recoveries that failed.
    pub edgeguard_conversions: usize,
    /// Combo strings started.
    pub number_of_openings: u16,
    /// Mean damage per combo string.
    pub average_damage_per_string: f32,
    /// Mean combo string length.
    pub average_seconds_per_string: f32,
    /// Mean hits per combo string.
    pub average_hits_per_string: f32,
    /// Damage of the most damaging string.
    pub most_damage_string: f32,
    /// Length of the longest string.
    pub most_seconds_string: f32,
    /// Hits in the string with the most hits.
    pub most_hits_string: u16,
    /// Per-stock breakdown.
    pub stocks: Vec<StockSummary>,
    /// Every completed combo string, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_strings: Option<Vec<ComboString>>,
    /// Every completed recovery, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoveries: Option<Vec<Recovery>>,
}

/// Summary of a whole match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    /// Stage id.
    pub stage: u16,
    /// Stage display name, if the id is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<&'static str>,
    /// Latest frame number.
    pub frames: u32,
    /// Frames the device skipped.
    pub frames_missed: u32,
    /// Match length.
    pub duration_seconds: f32,
    /// Win condition, if the match ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_condition: Option<u8>,
    /// Per-player statistics in wire order.
    pub players: Vec<PlayerSummary>,
}

/// Which per-record details to embed in a summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    /// Include every completed combo string.
    pub combo_strings: bool,
    /// Include every completed recovery.
    pub recoveries: bool,
}

#[allow(clippy::cast_precision_loss)]
fn seconds(frames: u32, fps: u32) -> f32 {
    frames as f32 / fps as f32
}

impl MatchSummary {
    /// Summarizes `game`.
    ///
    /// # Example
    ///
    /// ```
    /// use melee_stats::model::decode_start;
    /// use melee_stats::summary::{MatchSummary, SummaryOptions};
    /// use melee_stats::Config;
    ///
    /// let game = decode_start(&[0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0], 2).unwrap();
    /// let options = SummaryOptions::default();
    /// let summary = MatchSummary::from_match(&game, &Config::default(), options);
    /// assert_eq!(summary.stage_name, Some("Battlefield"));
    /// assert_eq!(summary.players[1].character_name, Some("Marth"));
    /// ```
    #[must_use]
    pub fn from_match(game: &Match, config: &Config, options: SummaryOptions) -> Self {
        let frames = game.frame_counter();
        let players = game.players();

        let summaries = players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let opponents = players
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != index)
                    .map(|(_, p)| p);
                summarize_player(player, opponents, frames, config, options)
            })
            .collect();

        MatchSummary {
            stage: game.stage_id(),
            stage_name: stage_name(game.stage_id()),
            frames,
            frames_missed: game.frames_missed(),
            duration_seconds: seconds(frames, config.frames_per_second),
            win_condition: game.win_condition(),
            players: summaries,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize_player<'a>(
    player: &Player,
    opponents: impl Iterator<Item = &'a Player>,
    frames: u32,
    config: &Config,
    options: SummaryOptions,
) -> PlayerSummary {
    let stats = player.stats();
    let identity = player.identity();
    let fps = config.frames_per_second;

    let (chances, conversions) = opponents.fold((0, 0), |(chances, conversions), opponent| {
        let recoveries = opponent.stats().recoveries();
        (
            chances + recoveries.len(),
            conversions + recoveries.iter().filter(|r| !r.is_successful).count(),
        )
    });

    let percent_of_match = |count: u32| {
        if frames == 0 {
            0.0
        } else {
            count as f32 / frames as f32 * 100.0
        }
    };

    PlayerSummary {
        port: identity.controller_port,
        character: identity.character_id,
        character_name: character_name(identity.character_id),
        color: identity.character_color,
        player_type: identity.player_type,
        stocks_remaining: player.current().stocks,
        actions: stats.action_count(),
        apm: stats.apm(frames, fps),
        percent_time_in_shield: percent_of_match(stats.frames_in_shield()),
        seconds_without_damage: seconds(stats.most_frames_without_damage(), fps),
        percent_time_above_opponent: percent_of_match(stats.frames_above_opponent()),
        percent_time_closest_center: percent_of_match(stats.frames_closest_center()),
        average_distance_from_center: stats.average_distance_from_center(),
        character_usage: stats
            .character_usage()
            .iter()
            .map(|(&id, &count)| (id, percent_of_match(count)))
            .collect(),
        roll_count: stats.roll_count(),
        spot_dodge_count: stats.spot_dodge_count(),
        air_dodge_count: stats.air_dodge_count(),
        recovery_attempts: stats.recovery_attempts(),
        successful_recoveries: stats.successful_recoveries(),
        average_edgeguard_damage_taken: stats.average_edgeguard_damage(),
        edgeguard_chances: chances,
        edgeguard_conversions: conversions,
        number_of_openings: stats.openings(),
        average_damage_per_string: stats.average_combo_string_damage(),
        average_seconds_per_string: stats.average_frames_per_string() / fps as f32,
        average_hits_per_string: stats.average_hits_per_string(),
        most_damage_string: stats.most_damage_string().map_or(0.0, ComboString::damage),
        most_seconds_string: stats
            .most_frames_string()
            .map_or(0.0, |c| seconds(c.duration_frames(), fps)),
        most_hits_string: stats.most_hits_string().map_or(0, |c| c.hit_count),
        stocks: stats
            .stocks()
            .iter()
            .map(|stock| summarize_stock(stock, frames, fps))
            .collect(),
        combo_strings: options
            .combo_strings
            .then(|| stats.combo_strings().to_vec()),
        recoveries: options.recoveries.then(|| stats.recoveries().to_vec()),
    }
}

fn summarize_stock(stock: &StockStatistics, frames: u32, fps: u32) -> StockSummary {
    StockSummary {
        time_seconds: seconds(stock.frame_end.unwrap_or(frames), fps),
        percent: stock.percent,
        last_hit_by: stock.last_hit_by,
        last_animation: stock.last_animation,
        openings_allowed: stock.openings_allowed,
        is_stock_lost: stock.is_stock_lost,
    }
}
