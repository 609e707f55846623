use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn league(n: usize, rounds: u32) -> Tournament {
    let players = (1..=n)
        .map(|i| Participant::new(format!("p{}", i), format!("Player {}", i)))
        .collect();
    Tournament::new("league-1", "Thursday League", rounds, players).unwrap()
}

/// Report every open match of the current round as a 2-0 win for player 1
fn finish_round(t: &mut Tournament) {
    let open: Vec<String> = t
        .matches_in_round(t.current_round)
        .filter(|m| !m.is_completed())
        .map(|m| m.id.clone())
        .collect();
    for id in open {
        t.report_points(&id, 2, 0).unwrap();
    }
}

#[test]
fn test_new_tournament_starts_in_setup() {
    let t = league(4, 3);

    assert_eq!(t.status, TournamentStatus::Setup);
    assert_eq!(t.current_round, 0);
    assert!(t.matches.is_empty());
    assert!(!t.round_complete());
}

#[test]
fn test_new_rejects_bad_configuration() {
    let dupes = vec![Participant::new("x", "X"), Participant::new("x", "Y")];
    assert_eq!(
        Tournament::new("t", "T", 3, dupes).unwrap_err(),
        TournamentError::DuplicateParticipant("x".to_string())
    );
    assert_eq!(
        Tournament::new("t", "T", 0, Vec::new()).unwrap_err(),
        TournamentError::NoRounds
    );
}

#[test]
fn test_start_round_pairs_round_one() {
    let mut t = league(5, 3);
    let mut rng = StdRng::seed_from_u64(3);

    let batch = t.start_round_with_rng(&mut rng).unwrap().to_vec();

    assert_eq!(batch.len(), 3);
    assert!(batch.iter().all(|m| m.round == 1));
    assert_eq!(t.status, TournamentStatus::Active);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.matches.len(), 3);

    let bye = batch.iter().find(|m| m.is_bye).unwrap();
    let lucky = t.participants.iter().find(|p| p.id == bye.player1_id).unwrap();
    assert_eq!((lucky.score, lucky.match_wins), (3, 1));
}

#[test]
fn test_round_cannot_be_paired_twice() {
    let mut t = league(4, 3);
    t.start_round().unwrap();

    assert_eq!(t.start_round().unwrap_err(), TournamentError::RoundAlreadyPaired(1));
}

#[test]
fn test_start_round_without_participants_fails() {
    let mut t = Tournament::new("empty", "Empty", 2, Vec::new()).unwrap();

    assert_eq!(t.start_round().unwrap_err(), TournamentError::EmptyParticipantSet);
    assert_eq!(t.status, TournamentStatus::Setup);
}

#[test]
fn test_reporting_updates_participants() {
    let mut t = league(2, 1);
    t.start_round().unwrap();
    let m = t.matches[0].clone();

    t.report_points(&m.id, 2, 1).unwrap();

    let winner = t.participants.iter().find(|p| p.id == m.player1_id).unwrap();
    let loser = t.participants.iter().find(|p| Some(&p.id) == m.player2_id.as_ref()).unwrap();
    assert_eq!((winner.score, winner.match_wins, winner.game_wins), (3, 1, 2));
    assert_eq!((loser.score, loser.match_losses, loser.game_wins), (0, 1, 1));
    assert!(winner.opponent_ids.contains(&loser.id));
    assert!(t.round_complete());
}

#[test]
fn test_correcting_a_report_does_not_double_count() {
    let mut t = league(2, 1);
    t.start_round().unwrap();
    let id = t.matches[0].id.clone();

    t.report_points(&id, 2, 0).unwrap();
    t.report_points(&id, 0, 2).unwrap();

    let scores: u32 = t.participants.iter().map(|p| p.score).sum();
    assert_eq!(scores, 3);
    assert!(t.participants.iter().all(|p| p.matches_played() == 1));
}

#[test]
fn test_nil_nil_report_leaves_match_open() {
    let mut t = league(2, 1);
    t.start_round().unwrap();
    let id = t.matches[0].id.clone();

    t.report_points(&id, 0, 0).unwrap();

    assert_eq!(t.matches[0].result, None);
    assert!(!t.round_complete());
}

#[test]
fn test_declared_draw() {
    let mut t = league(2, 1);
    t.start_round().unwrap();
    let id = t.matches[0].id.clone();

    t.declare_result(&id, MatchResult::Draw).unwrap();

    assert!(t.participants.iter().all(|p| p.score == 1 && p.match_draws == 1));
}

#[test]
fn test_unknown_match_and_bye_reports_fail() {
    let mut t = league(3, 2);
    t.start_round().unwrap();

    assert_eq!(
        t.report_points("9-9", 2, 0).unwrap_err(),
        TournamentError::UnknownMatch("9-9".to_string())
    );
    assert!(matches!(
        t.report_points("1-bye", 2, 0).unwrap_err(),
        TournamentError::MalformedMatchRecord { .. }
    ));
}

#[test]
fn test_advance_requires_a_finished_round() {
    let mut t = league(4, 2);
    assert_eq!(t.advance_round().unwrap_err(), TournamentError::RoundNotStarted(1));

    t.start_round().unwrap();
    assert_eq!(t.advance_round().unwrap_err(), TournamentError::RoundIncomplete(1));

    finish_round(&mut t);
    t.advance_round().unwrap();
    assert_eq!(t.current_round, 2);
    assert_eq!(t.advance_round().unwrap_err(), TournamentError::RoundNotStarted(2));
}

#[test]
fn test_full_event_runs_to_completion() {
    let mut t = league(8, 3);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..3 {
        t.start_round_with_rng(&mut rng).unwrap();
        finish_round(&mut t);
        t.advance_round().unwrap();
    }

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.current_round, 3);
    assert_eq!(t.matches.len(), 12);
    assert_eq!(t.start_round().unwrap_err(), TournamentError::TournamentCompleted);
    assert_eq!(t.advance_round().unwrap_err(), TournamentError::TournamentCompleted);

    for p in &t.participants {
        assert_eq!(p.matches_played(), 3);
        assert!(!p.opponent_ids.is_empty() && !p.opponent_ids.contains(&p.id));
    }

    // The only two 6-point players meet in the last round
    let standings = t.standings().unwrap();
    assert_eq!(standings[0].participant.score, 9);
    assert_eq!(standings[1].participant.score, 6);
    assert_eq!(standings.len(), 8);
}

#[test]
fn test_recommended_rounds() {
    assert_eq!(recommended_rounds(0), 1);
    assert_eq!(recommended_rounds(2), 1);
    assert_eq!(recommended_rounds(3), 2);
    assert_eq!(recommended_rounds(8), 3);
    assert_eq!(recommended_rounds(9), 4);
    assert_eq!(recommended_rounds(64), 6);
}
