//! Round lifecycle around the pairing engine and the standings calculator
//!
//! A [`Tournament`] is a plain snapshot: it carries its own id and is passed
//! around explicitly. Persisting it is the caller's job.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TournamentError};
use crate::pairing::generate_pairings_with_rng;
use crate::standings::{compute_standings, tally, RankedParticipant};
use crate::types::{ensure_unique_ids, Match, MatchResult, Participant};

#[cfg(test)]
#[path = "tournament_tests.rs"]
mod tournament_tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Setup,
    Active,
    Completed,
}

/// Snapshot of one tournament: roster, round counter and full match history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    /// Number of rounds to play
    #[serde(alias = "rounds")]
    pub total_rounds: u32,
    /// 0 until the first round is paired
    pub current_round: u32,
    pub status: TournamentStatus,
    #[serde(alias = "players")]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        total_rounds: u32,
        participants: Vec<Participant>,
    ) -> Result<Self> {
        if total_rounds == 0 {
            return Err(TournamentError::NoRounds);
        }
        ensure_unique_ids(&participants)?;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            total_rounds,
            current_round: 0,
            status: TournamentStatus::Setup,
            participants,
            matches: Vec::new(),
        })
    }

    /// Pair the current round (round 1 when still in setup) and store the batch.
    pub fn start_round(&mut self) -> Result<&[Match]> {
        self.start_round_with_rng(&mut rand::thread_rng())
    }

    /// Same as [`Tournament::start_round`] with a caller-supplied RNG.
    pub fn start_round_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Match]> {
        let round = match self.status {
            TournamentStatus::Completed => return Err(TournamentError::TournamentCompleted),
            TournamentStatus::Setup => 1,
            TournamentStatus::Active => self.current_round,
        };
        if self.matches.iter().any(|m| m.round == round) {
            return Err(TournamentError::RoundAlreadyPaired(round));
        }

        let prior: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| m.round < round)
            .cloned()
            .collect();
        let batch = generate_pairings_with_rng(&self.participants, round, &prior, rng)?;

        info!(
            tournament = %self.id,
            round,
            matches = batch.len(),
            "round started"
        );
        self.current_round = round;
        self.status = TournamentStatus::Active;
        let start = self.matches.len();
        self.matches.extend(batch);
        // A bye is already decided; credit it now
        self.retally()?;
        Ok(&self.matches[start..])
    }

    /// Report sub-scores for a match of the current round; the result is
    /// derived from them.
    pub fn report_points(
        &mut self,
        match_id: &str,
        player1_points: u32,
        player2_points: u32,
    ) -> Result<()> {
        self.current_match_mut(match_id)?
            .report_points(player1_points, player2_points)?;
        self.retally()
    }

    /// Set a result for a match of the current round without sub-scores.
    pub fn declare_result(&mut self, match_id: &str, result: MatchResult) -> Result<()> {
        self.current_match_mut(match_id)?.declare_result(result)?;
        self.retally()
    }

    /// True once the current round is paired and every match has a result
    pub fn round_complete(&self) -> bool {
        let mut current = self.matches_in_round(self.current_round).peekable();
        current.peek().is_some() && current.all(Match::is_completed)
    }

    /// Move on to the next round, or finish after the last one.
    pub fn advance_round(&mut self) -> Result<()> {
        match self.status {
            TournamentStatus::Completed => return Err(TournamentError::TournamentCompleted),
            TournamentStatus::Setup => return Err(TournamentError::RoundNotStarted(1)),
            TournamentStatus::Active => {}
        }
        if self.matches_in_round(self.current_round).next().is_none() {
            return Err(TournamentError::RoundNotStarted(self.current_round));
        }
        if !self.round_complete() {
            return Err(TournamentError::RoundIncomplete(self.current_round));
        }

        if self.current_round >= self.total_rounds {
            self.status = TournamentStatus::Completed;
            info!(tournament = %self.id, rounds = self.total_rounds, "tournament completed");
        } else {
            self.current_round += 1;
            info!(tournament = %self.id, round = self.current_round, "advanced round");
        }
        Ok(())
    }

    /// Current leaderboard over the whole history
    pub fn standings(&self) -> Result<Vec<RankedParticipant>> {
        compute_standings(&self.participants, &self.matches)
    }

    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    fn current_match_mut(&mut self, match_id: &str) -> Result<&mut Match> {
        let round = self.current_round;
        if self.status == TournamentStatus::Completed {
            return Err(TournamentError::TournamentCompleted);
        }
        self.matches
            .iter_mut()
            .find(|m| m.round == round && m.id == match_id)
            .ok_or_else(|| TournamentError::UnknownMatch(match_id.to_string()))
    }

    /// Rebuild every participant's counters from the match history.
    fn retally(&mut self) -> Result<()> {
        self.participants = tally(&self.participants, &self.matches)?;
        Ok(())
    }
}

/// Conventional Swiss length: enough rounds to separate a single winner,
/// `ceil(log2(n))`, never less than 1.
pub fn recommended_rounds(participants: usize) -> u32 {
    if participants <= 2 {
        return 1;
    }
    usize::BITS - (participants - 1).leading_zeros()
}
