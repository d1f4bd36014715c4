//! Derived per-player statistics.
//!
//! Everything here is append-only: completed combo strings, recoveries and
//! stocks are pushed once and never modified. Running averages are recomputed
//! from the full history every time a record is appended, except the
//! per-frame distance from center, which is a running mean.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::animation::DefensiveOption;

/// A sequence of hits landed on the opponent without a long enough gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComboString {
    /// Number of damaging hits in the string.
    pub hit_count: u16,
    /// Match frame of the opening hit.
    pub start_frame: u32,
    /// Match frame the string ended on.
    pub end_frame: u32,
    /// Opponent percent before the opening hit.
    pub start_percent: f32,
    /// Opponent percent when the string ended.
    pub end_percent: f32,
    /// Whether the string has been finalized.
    pub is_finished: bool,
}

impl ComboString {
    /// Opens a string on its first hit.
    #[must_use]
    pub fn new(start_frame: u32, start_percent: f32) -> Self {
        ComboString {
            hit_count: 1,
            start_frame,
            end_frame: start_frame,
            start_percent,
            end_percent: start_percent,
            is_finished: false,
        }
    }

    /// Damage dealt over the string.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.end_percent - self.start_percent
    }

    /// Length of the string in frames.
    #[must_use]
    pub fn duration_frames(&self) -> u32 {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

/// A completed attempt to return to the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recovery {
    /// Whether the player made it back and stabilized.
    pub is_successful: bool,
    /// Match frame the recovery began.
    pub start_frame: u32,
    /// Match frame the recovery concluded.
    pub end_frame: u32,
    /// Player percent when the recovery began.
    pub start_percent: f32,
    /// Player percent when the recovery concluded.
    pub end_percent: f32,
}

impl Recovery {
    /// Damage taken while recovering (edgeguard damage).
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.end_percent - self.start_percent
    }
}

/// Metrics for a single stock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StockStatistics {
    /// Match frame the stock started.
    pub frame_start: u32,
    /// Match frame the stock was lost, if it was.
    pub frame_end: Option<u32>,
    /// Percent when the stock was lost.
    pub percent: f32,
    /// Port of the player that last hit this one before the loss.
    pub last_hit_by: u8,
    /// Animation when the stock was lost.
    pub last_animation: u16,
    /// Combo strings the opponent opened during this stock.
    pub openings_allowed: u16,
    /// Whether this stock has been lost.
    pub is_stock_lost: bool,
}

/// Aggregated statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatistics {
    action_count: u32,
    openings: u16,
    combo_strings: Vec<ComboString>,
    current_combo_string: Option<ComboString>,
    recoveries: Vec<Recovery>,
    stocks: Vec<StockStatistics>,
    average_combo_string_damage: f32,
    average_edgeguard_damage: f32,
    roll_count: u16,
    spot_dodge_count: u16,
    air_dodge_count: u16,
    frames_in_shield: u32,
    most_frames_without_damage: u32,
    position_frames: u32,
    frames_above_opponent: u32,
    frames_closest_center: u32,
    average_distance_from_center: f32,
    character_usage: BTreeMap<u8, u32>,
}

impl Default for PlayerStatistics {
    fn default() -> Self {
        PlayerStatistics {
            action_count: 0,
            openings: 0,
            combo_strings: Vec::new(),
            current_combo_string: None,
            recoveries: Vec::new(),
            stocks: vec![StockStatistics::default()],
            average_combo_string_damage: 0.0,
            average_edgeguard_damage: 0.0,
            roll_count: 0,
            spot_dodge_count: 0,
            air_dodge_count: 0,
            frames_in_shield: 0,
            most_frames_without_damage: 0,
            position_frames: 0,
            frames_above_opponent: 0,
            frames_closest_center: 0,
            average_distance_from_center: 0.0,
            character_usage: BTreeMap::new(),
        }
    }
}

/// Mean of `values`, or 0 when empty.
#[allow(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f32>() / len as f32
}

impl PlayerStatistics {
    /// Creates statistics seeded with one open stock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Total counted actions.
    #[must_use]
    pub fn action_count(&self) -> u32 {
        self.action_count
    }

    /// Number of combo strings opened, finished or not.
    #[must_use]
    pub fn openings(&self) -> u16 {
        self.openings
    }

    /// Completed combo strings in order.
    #[must_use]
    pub fn combo_strings(&self) -> &[ComboString] {
        &self.combo_strings
    }

    /// The combo string in progress, if any.
    #[must_use]
    pub fn current_combo_string(&self) -> Option<&ComboString> {
        self.current_combo_string.as_ref()
    }

    /// Completed recoveries in order.
    #[must_use]
    pub fn recoveries(&self) -> &[Recovery] {
        &self.recoveries
    }

    /// Per-stock statistics; the last entry is the current stock.
    #[must_use]
    pub fn stocks(&self) -> &[StockStatistics] {
        &self.stocks
    }

    /// Mean damage over completed combo strings.
    #[must_use]
    pub fn average_combo_string_damage(&self) -> f32 {
        self.average_combo_string_damage
    }

    /// Mean damage taken over completed recoveries.
    #[must_use]
    pub fn average_edgeguard_damage(&self) -> f32 {
        self.average_edgeguard_damage
    }

    /// Rolls performed.
    #[must_use]
    pub fn roll_count(&self) -> u16 {
        self.roll_count
    }

    /// Spot dodges performed.
    #[must_use]
    pub fn spot_dodge_count(&self) -> u16 {
        self.spot_dodge_count
    }

    /// Air dodges performed.
    #[must_use]
    pub fn air_dodge_count(&self) -> u16 {
        self.air_dodge_count
    }

    /// Frames spent shielding.
    #[must_use]
    pub fn frames_in_shield(&self) -> u32 {
        self.frames_in_shield
    }

    /// Longest stretch of frames without taking damage.
    #[must_use]
    pub fn most_frames_without_damage(&self) -> u32 {
        self.most_frames_without_damage
    }

    /// Frames spent higher on screen than the opponent.
    #[must_use]
    pub fn frames_above_opponent(&self) -> u32 {
        self.frames_above_opponent
    }

    /// Frames spent closer to the stage center than the opponent.
    #[must_use]
    pub fn frames_closest_center(&self) -> u32 {
        self.frames_closest_center
    }

    /// Mean horizontal distance from the stage center over all frames.
    #[must_use]
    pub fn average_distance_from_center(&self) -> f32 {
        self.average_distance_from_center
    }

    /// Frames played per internal character id.
    ///
    /// More than one entry means the player transformed during the match
    /// (Sheik and Zelda).
    #[must_use]
    pub fn character_usage(&self) -> &BTreeMap<u8, u32> {
        &self.character_usage
    }

    /// Internal character id played for the most frames.
    #[must_use]
    pub fn most_used_character(&self) -> Option<u8> {
        self.character_usage
            .iter()
            .max_by_key(|&(_, frames)| *frames)
            .map(|(&id, _)| id)
    }

    /// Number of completed recoveries, successful or not.
    #[must_use]
    pub fn recovery_attempts(&self) -> usize {
        self.recoveries.len()
    }

    /// Number of successful recoveries.
    #[must_use]
    pub fn successful_recoveries(&self) -> usize {
        self.recoveries.iter().filter(|r| r.is_successful).count()
    }

    /// Mean hits per completed combo string.
    #[must_use]
    pub fn average_hits_per_string(&self) -> f32 {
        mean(self.combo_strings.iter().map(|c| f32::from(c.hit_count)))
    }

    /// Mean frames per completed combo string.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_frames_per_string(&self) -> f32 {
        mean(self.combo_strings.iter().map(|c| c.duration_frames() as f32))
    }

    /// The completed string that did the most damage.
    #[must_use]
    pub fn most_damage_string(&self) -> Option<&ComboString> {
        self.combo_strings
            .iter()
            .max_by(|a, b| a.damage().total_cmp(&b.damage()))
    }

    /// The completed string with the most hits.
    #[must_use]
    pub fn most_hits_string(&self) -> Option<&ComboString> {
        self.combo_strings.iter().max_by_key(|c| c.hit_count)
    }

    /// The longest completed string.
    #[must_use]
    pub fn most_frames_string(&self) -> Option<&ComboString> {
        self.combo_strings.iter().max_by_key(|c| c.duration_frames())
    }

    /// Actions per minute over `frames` frames at `frames_per_second`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn apm(&self, frames: u32, frames_per_second: u32) -> f32 {
        if frames == 0 {
            return 0.0;
        }
        let minutes = frames as f32 / frames_per_second as f32 / 60.0;
        self.action_count as f32 / minutes
    }

    // ---------------------------------------------------------------------
    // Mutation (statistics engine only)
    // ---------------------------------------------------------------------

    pub(crate) fn add_actions(&mut self, count: u32) {
        self.action_count = self.action_count.saturating_add(count);
    }

    pub(crate) fn open_combo_string(&mut self, start_frame: u32, start_percent: f32) {
        self.openings = self.openings.saturating_add(1);
        self.current_combo_string = Some(ComboString::new(start_frame, start_percent));
    }

    pub(crate) fn set_combo_hits(&mut self, hit_count: u16) {
        if let Some(current) = self.current_combo_string.as_mut() {
            current.hit_count = hit_count;
        }
    }

    /// Finalizes the string in progress and returns it.
    pub(crate) fn finish_combo_string(
        &mut self,
        end_frame: u32,
        end_percent: f32,
    ) -> Option<ComboString> {
        let mut finished = self.current_combo_string.take()?;
        finished.end_frame = end_frame;
        finished.end_percent = end_percent;
        finished.is_finished = true;
        self.combo_strings.push(finished);
        self.average_combo_string_damage = mean(self.combo_strings.iter().map(ComboString::damage));
        Some(finished)
    }

    pub(crate) fn add_recovery(&mut self, recovery: Recovery) {
        self.recoveries.push(recovery);
        self.average_edgeguard_damage = mean(self.recoveries.iter().map(Recovery::damage));
    }

    pub(crate) fn current_stock_mut(&mut self) -> Option<&mut StockStatistics> {
        self.stocks.last_mut().filter(|s| !s.is_stock_lost)
    }

    /// Closes the current stock and, if `open_next`, starts a new one.
    pub(crate) fn lose_stock(&mut self, lost: StockStatistics, open_next: bool) {
        if let Some(current) = self.current_stock_mut() {
            *current = StockStatistics {
                frame_start: current.frame_start,
                openings_allowed: current.openings_allowed,
                is_stock_lost: true,
                ..lost
            };
        }
        if open_next {
            self.stocks.push(StockStatistics {
                frame_start: lost.frame_end.unwrap_or_default(),
                ..StockStatistics::default()
            });
        }
    }

    pub(crate) fn record_defensive_option(&mut self, option: DefensiveOption) {
        let counter = match option {
            DefensiveOption::Roll => &mut self.roll_count,
            DefensiveOption::SpotDodge => &mut self.spot_dodge_count,
            DefensiveOption::AirDodge => &mut self.air_dodge_count,
        };
        *counter = counter.saturating_add(1);
    }

    pub(crate) fn add_shield_frame(&mut self) {
        self.frames_in_shield = self.frames_in_shield.saturating_add(1);
    }

    pub(crate) fn observe_frames_without_damage(&mut self, frames: u32) {
        self.most_frames_without_damage = self.most_frames_without_damage.max(frames);
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn observe_position(&mut self, above: bool, closest: bool, distance: f32) {
        self.position_frames = self.position_frames.saturating_add(1);
        if above {
            self.frames_above_opponent += 1;
        }
        if closest {
            self.frames_closest_center += 1;
        }
        self.average_distance_from_center +=
            (distance - self.average_distance_from_center) / self.position_frames as f32;
    }

    pub(crate) fn add_character_frame(&mut self, internal_character_id: u8) {
        *self.character_usage.entry(internal_character_id).or_insert(0) += 1;
    }
}
