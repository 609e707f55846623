//! Errors raised by the pairing engine, the standings calculator and the
//! tournament lifecycle.
//!
//! Only malformed input is an error. A forced repeat pairing or a participant
//! with no history are valid outcomes and are returned as normal results.

use thiserror::Error;

use crate::types::ParticipantId;

pub type Result<T> = std::result::Result<T, TournamentError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    /// Round numbers start at 1
    #[error("invalid round {0}: rounds are numbered from 1")]
    InvalidRound(u32),

    #[error("cannot pair a round with no participants")]
    EmptyParticipantSet,

    /// A stored match contradicts itself; treat as corrupted input data
    #[error("malformed match record {match_id}: {reason}")]
    MalformedMatchRecord { match_id: String, reason: String },

    #[error("participant {0} is registered more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("no match with id {0} in the current round")]
    UnknownMatch(String),

    #[error("round {0} has already been paired")]
    RoundAlreadyPaired(u32),

    #[error("round {0} still has matches without a result")]
    RoundIncomplete(u32),

    #[error("round {0} has not been paired yet")]
    RoundNotStarted(u32),

    #[error("tournament is already completed")]
    TournamentCompleted,

    #[error("a tournament needs at least one round")]
    NoRounds,
}

impl TournamentError {
    pub(crate) fn malformed(match_id: &str, reason: impl Into<String>) -> Self {
        TournamentError::MalformedMatchRecord {
            match_id: match_id.to_string(),
            reason: reason.into(),
        }
    }
}
