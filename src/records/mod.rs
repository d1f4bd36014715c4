//! Wire records for the three match stream messages.
//!
//! - **Start**: stage and static player identities
//! - **Update**: frame number, random seed and per-player frame data
//! - **End**: win condition
//!
//! These are pure decode targets: parsing never touches a [`Match`]. The
//! model layer applies them (see [`crate::model`]). Each record can also be
//! encoded back to its exact wire bytes, which the capture tooling and tests
//! use to synthesize streams.
//!
//! [`Match`]: crate::model::Match

pub mod end;
pub mod start;
pub mod update;

pub use end::EndMessage;
pub use start::{PlayerIdentity, StartMessage};
pub use update::UpdateMessage;
