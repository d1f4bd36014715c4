//! Decoded and derived match state.
//!
//! - [`Match`]: stage, frame accounting, players, raw byte log
//! - [`Player`]: static identity plus current/previous [`PlayerFrameData`]
//! - [`PlayerFlags`]: transient recovery and combo-string state
//! - [`PlayerStatistics`]: action count, [`ComboString`]s, [`Recovery`]s and
//!   [`StockStatistics`]
//!
//! The model is plain data. Only the decoder writes frame data and only the
//! statistics engine writes flags and statistics; everything else reads.
//!
//! # Example
//!
//! ```
//! use melee_stats::model::{decode_end, decode_start, decode_update};
//! use melee_stats::records::UpdateMessage;
//! use melee_stats::PlayerFrameData;
//!
//! let mut game = decode_start(&[0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0], 2)?;
//!
//! let update = UpdateMessage {
//!     frame: 1,
//!     random_seed: 0,
//!     players: vec![PlayerFrameData::default(); 2],
//! };
//! decode_update(&update.to_bytes(), &mut game)?;
//! decode_end(&[0x39, 0x02], &mut game)?;
//!
//! assert_eq!(game.frame_counter(), 1);
//! assert_eq!(game.win_condition(), Some(2));
//! # Ok::<(), melee_stats::ParserError>(())
//! ```

pub mod frame;
pub mod game;
pub mod player;
pub mod statistics;

pub use frame::PlayerFrameData;
pub use game::{decode_end, decode_start, decode_update, Match};
pub use player::{Player, PlayerFlags};
pub use statistics::{ComboString, PlayerStatistics, Recovery, StockStatistics};
