//! Swiss-system pairing and standings
//!
//! This crate provides:
//! - A pairing engine that produces one round of head-to-head matches,
//!   avoiding repeat opponents where the greedy scan can
//! - A standings calculator that rebuilds every participant's record from the
//!   match history and ranks by score, OMW%, GWP% and match wins
//! - A small round lifecycle (`Tournament`) tying the two together
//!
//! Both core functions are pure: they never modify their inputs and never
//! perform I/O.
//!
//! # Usage
//!
//! ```
//! use swiss_core::{compute_standings, generate_pairings, Participant};
//!
//! let players: Vec<Participant> = ["ann", "bob", "cy"]
//!     .iter()
//!     .map(|name| Participant::new(*name, *name))
//!     .collect();
//!
//! let round_one = generate_pairings(&players, 1, &[]).unwrap();
//! assert_eq!(round_one.len(), 2); // one pairing and one bye
//!
//! let standings = compute_standings(&players, &round_one).unwrap();
//! assert_eq!(standings[0].participant.score, 3); // the bye recipient
//! ```

pub mod error;
pub mod pairing;
pub mod standings;
pub mod tournament;
pub mod types;

pub use error::*;
pub use pairing::*;
pub use standings::*;
pub use tournament::*;
pub use types::*;
