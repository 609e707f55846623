//! Participants, matches and the scoring constants shared by the pairing
//! engine and the standings calculator.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::{Result, TournamentError};

/// Opaque participant identifier, stable across rounds
pub type ParticipantId = String;

/// Competition points for a match win (a bye counts as a win)
pub const POINTS_FOR_WIN: u32 = 3;

/// Competition points for a drawn match
pub const POINTS_FOR_DRAW: u32 = 1;

/// Competition points for a lost match
pub const POINTS_FOR_LOSS: u32 = 0;

/// Games credited to a bye recipient so the bye does not drag down GWP%
pub const BYE_GAME_WINS: u32 = 2;

/// Tiebreak percentages closer than this are treated as equal
pub const TIEBREAK_EPSILON: f64 = 0.01;

/// Suffix of the bye match id (`"<round>-bye"`)
pub const BYE_SUFFIX: &str = "bye";

/// A registered competitor and the counters derived from its match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    /// Free-form name, never used for pairing or ranking
    #[serde(alias = "nickname")]
    pub display_name: String,
    /// Accumulated competition points
    #[serde(default, alias = "points")]
    pub score: u32,
    #[serde(default)]
    pub match_wins: u32,
    #[serde(default)]
    pub match_losses: u32,
    #[serde(default)]
    pub match_draws: u32,
    #[serde(default)]
    pub game_wins: u32,
    #[serde(default)]
    pub game_losses: u32,
    /// Everyone this participant has faced, recorded once per opponent
    #[serde(default)]
    pub opponent_ids: BTreeSet<ParticipantId>,
}

impl Participant {
    /// Register a participant with no history.
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            score: 0,
            match_wins: 0,
            match_losses: 0,
            match_draws: 0,
            game_wins: 0,
            game_losses: 0,
            opponent_ids: BTreeSet::new(),
        }
    }

    /// Completed non-bye matches plus byes, i.e. every match with an outcome
    pub fn matches_played(&self) -> u32 {
        self.match_wins
            .saturating_add(self.match_losses)
            .saturating_add(self.match_draws)
    }

    /// Same participant with every derived counter reset to zero
    pub(crate) fn cleared(&self) -> Self {
        Self::new(self.id.clone(), self.display_name.clone())
    }
}

/// Outcome of a completed match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Player1,
    Player2,
    Draw,
}

impl MatchResult {
    /// Derive the outcome from reported sub-scores.
    ///
    /// Returns `None` for 0-0, which means the match has not been played.
    pub fn from_points(player1_points: u32, player2_points: u32) -> Option<Self> {
        match player1_points.cmp(&player2_points) {
            std::cmp::Ordering::Greater => Some(MatchResult::Player1),
            std::cmp::Ordering::Less => Some(MatchResult::Player2),
            std::cmp::Ordering::Equal if player1_points > 0 => Some(MatchResult::Draw),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// One side of a match, used to record who won an individual game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Player1,
    Player2,
}

/// A head-to-head pairing (or a bye) within one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// `"<round>-<seq>"`, or `"<round>-bye"` for the bye
    pub id: String,
    pub round: u32,
    pub player1_id: ParticipantId,
    /// `None` exactly when `is_bye` is set
    #[serde(default, deserialize_with = "empty_as_none")]
    pub player2_id: Option<ParticipantId>,
    #[serde(default)]
    pub is_bye: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2_points: Option<u32>,
    /// Winner of each individual game, when reported game by game
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub game_results: Vec<Seat>,
}

/// Older snapshots store the missing opponent as an empty string.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<ParticipantId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<ParticipantId>::deserialize(deserializer)?;
    Ok(id.filter(|id| !id.is_empty()))
}

impl Match {
    /// An unplayed pairing; `seq` is the 1-based position within the round.
    pub fn pairing(
        round: u32,
        seq: usize,
        player1_id: impl Into<ParticipantId>,
        player2_id: impl Into<ParticipantId>,
    ) -> Self {
        Self {
            id: format!("{}-{}", round, seq),
            round,
            player1_id: player1_id.into(),
            player2_id: Some(player2_id.into()),
            is_bye: false,
            result: None,
            player1_points: None,
            player2_points: None,
            game_results: Vec::new(),
        }
    }

    /// The round's bye, already decided in favour of `player1_id`.
    pub fn bye(round: u32, player1_id: impl Into<ParticipantId>) -> Self {
        Self {
            id: format!("{}-{}", round, BYE_SUFFIX),
            round,
            player1_id: player1_id.into(),
            player2_id: None,
            is_bye: true,
            result: Some(MatchResult::Player1),
            player1_points: Some(BYE_GAME_WINS),
            player2_points: Some(0),
            game_results: Vec::new(),
        }
    }

    pub fn involves(&self, id: &str) -> bool {
        self.player1_id == id || self.player2_id.as_deref() == Some(id)
    }

    /// The other participant in this match, if `id` plays in it and it is not a bye
    pub fn opponent_of(&self, id: &str) -> Option<&str> {
        if self.player1_id == id {
            self.player2_id.as_deref()
        } else if self.player2_id.as_deref() == Some(id) {
            Some(&self.player1_id)
        } else {
            None
        }
    }

    /// True when `a` and `b` met each other in this (non-bye) match
    pub fn same_pairing(&self, a: &str, b: &str) -> bool {
        !self.is_bye && self.opponent_of(a) == Some(b)
    }

    pub fn is_completed(&self) -> bool {
        self.is_bye || self.result.is_some()
    }

    /// Store reported sub-scores and derive the result from them.
    ///
    /// A 0-0 report leaves the match unset.
    pub fn report_points(&mut self, player1_points: u32, player2_points: u32) -> Result<()> {
        if self.is_bye {
            return Err(TournamentError::malformed(
                &self.id,
                "a bye has no score to report",
            ));
        }
        self.player1_points = Some(player1_points);
        self.player2_points = Some(player2_points);
        self.result = MatchResult::from_points(player1_points, player2_points);
        Ok(())
    }

    /// Declare an outcome directly, without sub-scores.
    ///
    /// Clears previously reported points and game winners so the record
    /// stays self-consistent.
    pub fn declare_result(&mut self, result: MatchResult) -> Result<()> {
        if self.is_bye {
            return Err(TournamentError::malformed(
                &self.id,
                "a bye is always won by player 1",
            ));
        }
        self.result = Some(result);
        self.player1_points = None;
        self.player2_points = None;
        self.game_results.clear();
        Ok(())
    }

    /// Check the record for contradictions that indicate corrupted data.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| Err(TournamentError::malformed(&self.id, reason));

        if self.round == 0 {
            return fail("round 0 does not exist");
        }
        if self.player1_id.is_empty() {
            return fail("missing player 1");
        }
        match (&self.player2_id, self.is_bye) {
            (Some(_), true) => return fail("a bye cannot have an opponent"),
            (None, false) => return fail("missing player 2"),
            (Some(p2), false) if *p2 == self.player1_id => {
                return fail("participant paired against itself")
            }
            _ => {}
        }
        if self.is_bye && self.result.is_some_and(|r| r != MatchResult::Player1) {
            return fail("a bye can only be won by player 1");
        }
        if let (Some(p1), Some(p2)) = (self.player1_points, self.player2_points) {
            if self.result != MatchResult::from_points(p1, p2) {
                return fail("result disagrees with the reported points");
            }
        }
        Ok(())
    }
}

/// Reject participant lists that register the same id twice.
pub(crate) fn ensure_unique_ids(participants: &[Participant]) -> Result<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id.as_str()) {
            return Err(TournamentError::DuplicateParticipant(p.id.clone()));
        }
    }
    Ok(())
}
