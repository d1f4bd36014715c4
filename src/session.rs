//! Per-connection message dispatch.
//!
//! A [`Session`] owns at most one [`Match`] and feeds it payloads in arrival
//! order. It is the only place that decides what to do with a payload:
//!
//! | Payload | Effect |
//! |---------|--------|
//! | empty | ignored |
//! | unknown discriminant | ignored |
//! | Start | replaces the current match with a fresh one |
//! | Update | decoded into the match, then statistics run |
//! | End | win condition recorded |
//! | Update/End with no match | ignored |
//!
//! Ignored payloads leave all state untouched and are reported as
//! [`Outcome::Ignored`]. Truncated payloads are errors and also leave all
//! state untouched.
//!
//! # Example
//!
//! ```
//! use melee_stats::session::{Outcome, Session};
//! use melee_stats::Config;
//!
//! let mut session = Session::new(Config::default());
//! assert!(matches!(session.process(&[0x39, 0x01])?, Outcome::Ignored(_)));
//!
//! let start = [0x37, 0x00, 0x20, 0, 2, 0, 1, 1, 9, 0, 0];
//! assert_eq!(session.process(&start)?, Outcome::Started);
//! assert_eq!(&session.last_record()[..4], &[0, 0, 0, 11]);
//! # Ok::<(), melee_stats::ParserError>(())
//! ```

use tracing::{debug, info, warn};

use crate::capture::{frame_record, CaptureIterator};
use crate::config::Config;
use crate::error::{ParserError, Result};
use crate::format::{detect_message_type, MessageType};
use crate::model::{decode_end, decode_start, decode_update, Match};
use crate::stats::compute_stats;

/// Callback registered by a presentation layer.
///
/// Every hook receives the match after the message has been fully applied,
/// statistics included.
pub trait MatchObserver {
    /// Called after a Start message created a new match.
    fn on_start(&mut self, _game: &Match) {}

    /// Called after an Update message was applied.
    fn on_update(&mut self, _game: &Match) {}

    /// Called after an End message was applied.
    fn on_end(&mut self, _game: &Match) {}
}

/// Why a payload was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Zero-length payload.
    Empty,
    /// Discriminant not recognized.
    UnknownType(u8),
    /// Update or End before any Start.
    BeforeStart(MessageType),
}

impl IgnoredReason {
    /// The equivalent error, for callers that want to treat drops as failures.
    #[must_use]
    pub fn to_error(self) -> ParserError {
        match self {
            IgnoredReason::Empty => ParserError::EmptyMessage,
            IgnoredReason::UnknownType(code) => ParserError::UnknownMessageType(code),
            IgnoredReason::BeforeStart(kind) => ParserError::OutOfOrderUpdate {
                message: kind.name(),
            },
        }
    }
}

/// What processing a payload did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new match was started.
    Started,
    /// The match advanced to `frame`.
    Updated {
        /// Frame counter after the update.
        frame: u32,
    },
    /// The match ended.
    Ended {
        /// Win condition from the End message.
        win_condition: u8,
    },
    /// The payload was dropped without touching any state.
    Ignored(IgnoredReason),
}

/// Decoder state for one connection.
pub struct Session {
    config: Config,
    game: Option<Match>,
    last_record: Vec<u8>,
    observer: Option<Box<dyn MatchObserver + Send>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("game", &self.game)
            .field("last_record_len", &self.last_record.len())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Session {
            config,
            game: None,
            last_record: Vec::new(),
            observer: None,
        }
    }

    /// Registers the observer notified after every applied message.
    pub fn set_observer(&mut self, observer: Box<dyn MatchObserver + Send>) {
        self.observer = Some(observer);
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the match in progress (or the last one, once ended).
    #[must_use]
    pub fn current_match(&self) -> Option<&Match> {
        self.game.as_ref()
    }

    /// Removes and returns the current match.
    pub fn take_match(&mut self) -> Option<Match> {
        self.game.take()
    }

    /// Length-prefixed record of the last applied payload.
    #[must_use]
    pub fn last_record(&self) -> &[u8] {
        &self.last_record
    }

    /// Processes one payload.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TruncatedMessage` if a Start, Update or End
    /// payload is too short. No state changes in that case.
    pub fn process(&mut self, payload: &[u8]) -> Result<Outcome> {
        let kind = match detect_message_type(payload) {
            Ok(kind) => kind,
            Err(ParserError::EmptyMessage) => return Ok(self.ignore(IgnoredReason::Empty)),
            Err(ParserError::UnknownMessageType(code)) => {
                return Ok(self.ignore(IgnoredReason::UnknownType(code)))
            }
            Err(e) => return Err(e),
        };

        let outcome = match kind {
            MessageType::Start => {
                let game = decode_start(payload, self.config.player_count)?;
                info!(
                    stage = game.stage_id(),
                    players = game.players().len(),
                    "match started"
                );
                if let Some(previous) = self.game.replace(game) {
                    if !previous.is_finished() {
                        warn!(
                            frame = previous.frame_counter(),
                            "match replaced before it ended"
                        );
                    }
                }
                Outcome::Started
            }
            MessageType::Update => {
                let Some(game) = self.game.as_mut() else {
                    return Ok(self.ignore(IgnoredReason::BeforeStart(kind)));
                };
                decode_update(payload, game)?;
                if self.config.stats_enabled() {
                    compute_stats(game, &self.config);
                }
                Outcome::Updated {
                    frame: game.frame_counter(),
                }
            }
            MessageType::End => {
                let Some(game) = self.game.as_mut() else {
                    return Ok(self.ignore(IgnoredReason::BeforeStart(kind)));
                };
                decode_end(payload, game)?;
                let win_condition = game.win_condition().unwrap_or_default();
                info!(
                    win_condition,
                    frames = game.frame_counter(),
                    missed = game.frames_missed(),
                    "match ended"
                );
                Outcome::Ended { win_condition }
            }
        };

        self.last_record = frame_record(payload);
        self.notify(kind);
        Ok(outcome)
    }

    fn ignore(&self, reason: IgnoredReason) -> Outcome {
        warn!(?reason, "payload ignored");
        Outcome::Ignored(reason)
    }

    fn notify(&mut self, kind: MessageType) {
        let (Some(observer), Some(game)) = (self.observer.as_mut(), self.game.as_ref()) else {
            return;
        };
        match kind {
            MessageType::Start => observer.on_start(game),
            MessageType::Update => observer.on_update(game),
            MessageType::End => observer.on_end(game),
        }
    }
}

/// Matches and counters produced by replaying a whole capture.
#[derive(Debug, Default)]
pub struct Replay {
    /// Every match found, in capture order.
    pub matches: Vec<Match>,
    /// Records read from the capture.
    pub records: usize,
    /// Records dropped as empty, unknown or out of order.
    pub ignored: usize,
}

/// Replays a capture through a fresh session.
///
/// A Start record closes the previous match; a match without an End record
/// is still returned.
///
/// # Errors
///
/// Returns the first framing or decode error.
pub fn replay(capture: &[u8], config: Config) -> Result<Replay> {
    let mut session = Session::new(config);
    let mut result = Replay::default();

    for payload in CaptureIterator::new(capture) {
        let payload = payload?;
        result.records += 1;

        if payload.first() == Some(&MessageType::Start.code()) {
            if let Some(game) = session.take_match() {
                result.matches.push(game);
            }
        }

        if let Outcome::Ignored(_) = session.process(payload)? {
            result.ignored += 1;
        }
    }

    result.matches.extend(session.take_match());
    debug!(
        records = result.records,
        matches = result.matches.len(),
        "capture replayed"
    );
    Ok(result)
}
