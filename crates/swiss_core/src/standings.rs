//! Standings and tiebreakers
//!
//! Every call rebuilds the participants' counters from the full match list.
//! Nothing is patched incrementally, so stored counters can never drift from
//! the history they are derived from.
//!
//! Ranking order: score, then opponent match-win percentage (OMW%), then game
//! win percentage (GWP%), then match wins. Remaining ties keep input order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::types::{
    ensure_unique_ids, Match, MatchResult, Participant, Seat, BYE_GAME_WINS, POINTS_FOR_DRAW,
    POINTS_FOR_LOSS, POINTS_FOR_WIN, TIEBREAK_EPSILON,
};

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;

/// A participant with its computed tiebreakers and final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedParticipant {
    #[serde(flatten)]
    pub participant: Participant,
    /// Opponent match-win percentage, 0-100
    #[serde(alias = "omwPercentage")]
    pub opponent_match_win_pct: f64,
    /// Game-win percentage, 0-100
    #[serde(alias = "gwpPercentage")]
    pub game_win_pct: f64,
    /// 1-based position; exact ties still get distinct ranks
    pub rank: usize,
}

/// Recompute every participant's counters and rank them.
pub fn compute_standings(
    participants: &[Participant],
    matches: &[Match],
) -> Result<Vec<RankedParticipant>> {
    let records = tally(participants, matches)?;
    Ok(rank_participants(&records))
}

/// Rebuild score, match record, game record and opponent set from scratch.
///
/// Counters already stored on `participants` are ignored. Unfinished matches
/// are skipped, as are match slots naming someone not in `participants`.
pub fn tally(participants: &[Participant], matches: &[Match]) -> Result<Vec<Participant>> {
    ensure_unique_ids(participants)?;
    matches.iter().try_for_each(Match::validate)?;

    let mut records: Vec<Participant> = participants.iter().map(Participant::cleared).collect();
    let index: HashMap<&str, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.as_str(), i))
        .collect();

    for m in matches.iter().filter(|m| m.is_completed()) {
        if m.is_bye {
            if let Some(&i) = index.get(m.player1_id.as_str()) {
                credit_bye(&mut records[i]);
            }
            continue;
        }
        let Some(player2_id) = m.player2_id.as_deref() else {
            continue;
        };
        if let Some(&i) = index.get(m.player1_id.as_str()) {
            credit_match(&mut records[i], m, Seat::Player1, player2_id);
        }
        if let Some(&i) = index.get(player2_id) {
            credit_match(&mut records[i], m, Seat::Player2, &m.player1_id);
        }
    }

    debug!(
        participants = records.len(),
        matches = matches.len(),
        "tallied match history"
    );
    Ok(records)
}

/// Compute OMW% and GWP% from the stored counters, sort and assign ranks.
///
/// Opponents that are no longer in `participants` do not contribute to OMW%.
pub fn rank_participants(participants: &[Participant]) -> Vec<RankedParticipant> {
    let by_id: HashMap<&str, &Participant> =
        participants.iter().map(|p| (p.id.as_str(), p)).collect();

    let ranked: Vec<RankedParticipant> = participants
        .iter()
        .map(|p| RankedParticipant {
            opponent_match_win_pct: opponent_match_win_pct(p, &by_id),
            game_win_pct: percentage(
                u64::from(p.game_wins),
                u64::from(p.game_wins) + u64::from(p.game_losses),
            ),
            participant: p.clone(),
            rank: 0,
        })
        .collect();

    let omw: Vec<f64> = ranked.iter().map(|r| r.opponent_match_win_pct).collect();
    let gwp: Vec<f64> = ranked.iter().map(|r| r.game_win_pct).collect();
    let mut keyed: Vec<Keyed> = ranked
        .into_iter()
        .zip(tiebreak_bands(&omw).into_iter().zip(tiebreak_bands(&gwp)))
        .map(|(entry, (omw_band, gwp_band))| Keyed {
            entry,
            omw_band,
            gwp_band,
        })
        .collect();

    // Stable: residual ties keep input order
    keyed.sort_by(compare_standing);
    keyed
        .into_iter()
        .enumerate()
        .map(|(i, k)| RankedParticipant {
            rank: i + 1,
            ..k.entry
        })
        .collect()
}

/// A ranked entry with its tiebreak bands; band 0 holds the highest values.
struct Keyed {
    entry: RankedParticipant,
    omw_band: usize,
    gwp_band: usize,
}

fn credit_bye(record: &mut Participant) {
    record.score = record.score.saturating_add(POINTS_FOR_WIN);
    record.match_wins = record.match_wins.saturating_add(1);
    record.game_wins = record.game_wins.saturating_add(BYE_GAME_WINS);
}

fn credit_match(record: &mut Participant, m: &Match, seat: Seat, opponent_id: &str) {
    let Some(result) = m.result else {
        return;
    };
    record.opponent_ids.insert(opponent_id.to_string());

    match (result, seat) {
        (MatchResult::Draw, _) => {
            record.score = record.score.saturating_add(POINTS_FOR_DRAW);
            record.match_draws = record.match_draws.saturating_add(1);
        }
        (MatchResult::Player1, Seat::Player1) | (MatchResult::Player2, Seat::Player2) => {
            record.score = record.score.saturating_add(POINTS_FOR_WIN);
            record.match_wins = record.match_wins.saturating_add(1);
        }
        _ => {
            record.score = record.score.saturating_add(POINTS_FOR_LOSS);
            record.match_losses = record.match_losses.saturating_add(1);
        }
    }

    let (won, lost) = games_for(m, seat);
    record.game_wins = record.game_wins.saturating_add(won);
    record.game_losses = record.game_losses.saturating_add(lost);
}

/// Games won and lost by `seat`: per-game winners when recorded, otherwise
/// the sub-scores.
fn games_for(m: &Match, seat: Seat) -> (u32, u32) {
    if !m.game_results.is_empty() {
        let won = m.game_results.iter().filter(|&&winner| winner == seat).count();
        let lost = m.game_results.len() - won;
        return (
            u32::try_from(won).unwrap_or(u32::MAX),
            u32::try_from(lost).unwrap_or(u32::MAX),
        );
    }
    match (m.player1_points, m.player2_points, seat) {
        (Some(p1), Some(p2), Seat::Player1) => (p1, p2),
        (Some(p1), Some(p2), Seat::Player2) => (p2, p1),
        _ => (0, 0),
    }
}

fn opponent_match_win_pct(p: &Participant, by_id: &HashMap<&str, &Participant>) -> f64 {
    let (wins, played) = p
        .opponent_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .fold((0u64, 0u64), |(wins, played), opp| {
            (
                wins + u64::from(opp.match_wins),
                played + u64::from(opp.matches_played()),
            )
        });
    percentage(wins, played)
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Group percentages into bands, highest first. A value joins the band of
/// the next higher value when the two are within [`TIEBREAK_EPSILON`], so
/// near-equal values always share a band and band order is a total order.
/// Chains of close values collapse into one band.
fn tiebreak_bands(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut bands = vec![0; values.len()];
    let mut band = 0;
    for pair in order.windows(2) {
        if values[pair[0]] - values[pair[1]] > TIEBREAK_EPSILON {
            band += 1;
        }
        bands[pair[1]] = band;
    }
    bands
}

fn compare_standing(a: &Keyed, b: &Keyed) -> Ordering {
    b.entry
        .participant
        .score
        .cmp(&a.entry.participant.score)
        .then_with(|| a.omw_band.cmp(&b.omw_band))
        .then_with(|| a.gwp_band.cmp(&b.gwp_band))
        .then_with(|| {
            b.entry
                .participant
                .match_wins
                .cmp(&a.entry.participant.match_wins)
        })
}
