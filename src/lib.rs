//! # Melee Stats
//!
//! Decoder and real-time statistics engine for the binary match stream sent
//! by a console-side capture device during a two-player Super Smash Bros.
//! Melee match.
//!
//! The device sends one payload per message:
//! - **Start**: stage and the static identity of every player
//! - **Update**: the full per-player state for one frame
//! - **End**: the win condition
//!
//! Every Update is decoded into the [`Match`] and then fed to the statistics
//! engine, which tracks actions, combo strings, recoveries and stocks as the
//! match plays out.
//!
//! ## Quick Start
//!
//! ```
//! use melee_stats::session::{Outcome, Session};
//! use melee_stats::{Config, Result};
//!
//! fn handle(session: &mut Session, payload: &[u8]) -> Result<()> {
//!     if let Outcome::Ended { .. } = session.process(payload)? {
//!         let game = session.current_match().expect("match in progress");
//!         for player in game.players() {
//!             println!(
//!                 "port {}: {} actions, {} combo strings",
//!                 player.controller_port(),
//!                 player.stats().action_count(),
//!                 player.stats().combo_strings().len(),
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//!
//! let mut session = Session::new(Config::default());
//! handle(&mut session, &[0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0])?;
//! handle(&mut session, &[0x39, 0x02])?;
//! # Ok::<(), melee_stats::ParserError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for decoding operations
//! - [`binary`] - Bounds-checked big-endian readers and writers
//! - [`format`] - Message discriminants and wire sizes
//! - [`records`] - Start, Update and End message parsing
//! - [`model`] - Match, player, frame data and statistics types
//! - [`geometry`] - Stick octants and stage boundaries
//! - [`animation`] - Animation code classification
//! - [`stats`] - The statistics engine
//! - [`session`] - Per-connection dispatch and observer hook
//! - [`capture`] - Length-prefixed raw records and capture iteration
//! - [`summary`] - Serializable end-of-match summaries
//! - [`config`] - TOML configuration
//! - [`ids`] - Character and stage display names
//!
//! All multi-byte fields are big-endian.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod binary;
pub mod capture;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod ids;
pub mod model;
pub mod records;
pub mod session;
pub mod stats;
pub mod summary;

// Re-export commonly used types at the crate root
pub use capture::{frame_record, CaptureIterator};
pub use config::Config;
pub use error::{ParserError, Result};
pub use format::{detect_message_type, MessageType};
pub use geometry::{classify_stick, is_off_stage, Octant, Stage};
pub use model::{
    decode_end, decode_start, decode_update, ComboString, Match, Player, PlayerFlags,
    PlayerFrameData, PlayerStatistics, Recovery, StockStatistics,
};
pub use session::{MatchObserver, Outcome, Session};
pub use stats::compute_stats;
pub use summary::MatchSummary;
