//! Swiss pairing engine
//!
//! Round 1 is a uniform shuffle. Later rounds walk the participants in seed
//! order (score, then match wins) and give each unpaired participant the first
//! lower-seeded participant it has not met yet. There is no backtracking: when
//! no fresh opponent is left, the first remaining participant is taken even if
//! that repeats a pairing. An odd participant out receives the bye.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::error::{Result, TournamentError};
use crate::types::{ensure_unique_ids, Match, Participant};

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;

/// Generate the matches for `round` using the thread-local RNG.
///
/// Every participant appears in exactly one returned match. Inputs are never
/// modified; the caller is responsible for storing the returned batch.
pub fn generate_pairings(
    participants: &[Participant],
    round: u32,
    prior_matches: &[Match],
) -> Result<Vec<Match>> {
    generate_pairings_with_rng(participants, round, prior_matches, &mut rand::thread_rng())
}

/// Same as [`generate_pairings`], drawing the round-1 shuffle from `rng`.
pub fn generate_pairings_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    round: u32,
    prior_matches: &[Match],
    rng: &mut R,
) -> Result<Vec<Match>> {
    validate_input(participants, round, prior_matches)?;

    let mut order = seed_order(participants);
    let matches = if round == 1 {
        order.shuffle(rng);
        pair_consecutive(&order, round)
    } else {
        let history = History::new(participants, prior_matches);
        pair_greedy(&order, round, &history)
    };

    debug!(
        round,
        participants = participants.len(),
        matches = matches.len(),
        "generated pairings"
    );
    Ok(matches)
}

/// Participants sorted by score, then match wins, both descending.
///
/// The sort is stable so equal seeds keep their registration order.
pub fn seed_order(participants: &[Participant]) -> Vec<&Participant> {
    let mut order: Vec<&Participant> = participants.iter().collect();
    order.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.match_wins.cmp(&a.match_wins))
    });
    order
}

fn validate_input(participants: &[Participant], round: u32, prior_matches: &[Match]) -> Result<()> {
    if round < 1 {
        return Err(TournamentError::InvalidRound(round));
    }
    if participants.is_empty() {
        return Err(TournamentError::EmptyParticipantSet);
    }

    ensure_unique_ids(participants)?;
    prior_matches.iter().try_for_each(Match::validate)
}

/// Who has already met whom, from both the participants' own opponent sets
/// and the recorded pairings.
struct History<'a> {
    met: HashMap<&'a str, HashSet<&'a str>>,
}

impl<'a> History<'a> {
    fn new(participants: &'a [Participant], prior_matches: &'a [Match]) -> Self {
        let mut met: HashMap<&str, HashSet<&str>> = HashMap::new();

        for p in participants {
            for opponent in &p.opponent_ids {
                met.entry(&p.id).or_default().insert(opponent);
                met.entry(opponent).or_default().insert(&p.id);
            }
        }
        for m in prior_matches.iter().filter(|m| !m.is_bye) {
            if let Some(p2) = m.player2_id.as_deref() {
                met.entry(&m.player1_id).or_default().insert(p2);
                met.entry(p2).or_default().insert(&m.player1_id);
            }
        }

        Self { met }
    }

    fn have_met(&self, a: &str, b: &str) -> bool {
        self.met.get(a).is_some_and(|opponents| opponents.contains(b))
    }
}

/// Pair `order[0]` with `order[1]`, `order[2]` with `order[3]`, and so on.
fn pair_consecutive(order: &[&Participant], round: u32) -> Vec<Match> {
    let mut matches: Vec<Match> = order
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Match::pairing(round, i + 1, &pair[0].id, &pair[1].id))
        .collect();

    if let [.., last] = order {
        if order.len() % 2 == 1 {
            matches.push(award_bye(round, last));
        }
    }
    matches
}

/// First-fit forward scan over the seed order.
fn pair_greedy(order: &[&Participant], round: u32, history: &History<'_>) -> Vec<Match> {
    let n = order.len();
    let mut paired = vec![false; n];
    let mut matches = Vec::with_capacity(n / 2 + 1);

    for i in 0..n {
        if paired[i] {
            continue;
        }
        let player = order[i];

        let fresh =
            (i + 1..n).find(|&j| !paired[j] && !history.have_met(&player.id, &order[j].id));
        let opponent = fresh.or_else(|| {
            let repeat = (i + 1..n).find(|&j| !paired[j]);
            if let Some(j) = repeat {
                warn!(
                    round,
                    player = %player.id,
                    opponent = %order[j].id,
                    "no fresh opponent left, repeating a pairing"
                );
            }
            repeat
        });

        if let Some(j) = opponent {
            paired[i] = true;
            paired[j] = true;
            matches.push(Match::pairing(round, matches.len() + 1, &player.id, &order[j].id));
        }
    }

    if let Some(i) = paired.iter().position(|&done| !done) {
        matches.push(award_bye(round, order[i]));
    }
    matches
}

fn award_bye(round: u32, participant: &Participant) -> Match {
    info!(round, participant = %participant.id, "awarding bye");
    Match::bye(round, &participant.id)
}
