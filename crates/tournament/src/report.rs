//! Plain-text pairings and standings tables

use swiss_core::{Match, MatchResult, RankedParticipant, Tournament};

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;

/// Pairings of `round` with their current results
pub fn pairings_table(tournament: &Tournament, round: u32) -> String {
    let name = |id: &str| {
        tournament
            .participants
            .iter()
            .find(|p| p.id == id)
            .map_or("Unknown", |p| p.display_name.as_str())
            .to_string()
    };

    let mut report = String::new();
    report.push_str(&format!(
        "=== {}: Round {} of {} ===\n\n",
        tournament.name, round, tournament.total_rounds
    ));
    report.push_str(&format!(
        "{:<8} {:<20}    {:<20} {:>7}\n",
        "Match", "Player 1", "Player 2", "Result"
    ));
    report.push_str(&"-".repeat(60));
    report.push('\n');

    for m in tournament.matches_in_round(round) {
        let opponent = match &m.player2_id {
            Some(id) => name(id.as_str()),
            None => "(bye)".to_string(),
        };
        report.push_str(&format!(
            "{:<8} {:<20} vs {:<20} {:>7}\n",
            m.id,
            name(m.player1_id.as_str()),
            opponent,
            result_label(m)
        ));
    }

    report
}

/// Leaderboard: rank, name, points, W-L-D record, OMW% and GWP%
pub fn standings_table(standings: &[RankedParticipant]) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "{:>4}  {:<24} {:>6} {:>9} {:>7} {:>7}\n",
        "Rank", "Player", "Points", "W-L-D", "OMW%", "GWP%"
    ));
    report.push_str(&"-".repeat(62));
    report.push('\n');

    for entry in standings {
        let p = &entry.participant;
        report.push_str(&format!(
            "{:>4}  {:<24} {:>6} {:>9} {:>7.1} {:>7.1}\n",
            entry.rank,
            p.display_name,
            p.score,
            format!("{}-{}-{}", p.match_wins, p.match_losses, p.match_draws),
            entry.opponent_match_win_pct,
            entry.game_win_pct
        ));
    }

    report
}

fn result_label(m: &Match) -> String {
    if m.is_bye {
        return "bye".to_string();
    }
    match (m.result, m.player1_points, m.player2_points) {
        (None, _, _) => "-".to_string(),
        (Some(_), Some(p1), Some(p2)) => format!("{}-{}", p1, p2),
        (Some(MatchResult::Player1), _, _) => "1-0".to_string(),
        (Some(MatchResult::Player2), _, _) => "0-1".to_string(),
        (Some(MatchResult::Draw), _, _) => "draw".to_string(),
    }
}
