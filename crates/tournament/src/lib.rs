//! Tournament runner for Swiss-system events
//!
//! This crate provides the application around `swiss_core`:
//! - Event configuration from `tournament.toml`
//! - JSON snapshots of the tournament between invocations
//! - Text reports for pairings and standings
//!
//! # Usage
//!
//! ```bash
//! # Create an event and pair round 1
//! swiss init --name "Friday Night" --player Ann --player Bob --player Cy
//! swiss pair
//!
//! # Report a 2-1 for match 1-1, then move on
//! swiss report 1-1 2 1
//! swiss advance
//! swiss standings
//! ```

mod config;
mod report;
mod store;

pub use config::*;
pub use report::*;
pub use store::*;
