//! Swiss tournament CLI
//!
//! Each command loads the snapshot, applies one operation, saves it back and
//! prints the affected table.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use swiss_core::{MatchResult, Tournament};
use tournament::{
    create, load, pairings_table, save, standings_table, EventConfig, DEFAULT_STATE_FILE,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swiss", about = "Swiss-system pairings and standings")]
struct Cli {
    /// Tournament snapshot to read and update
    #[arg(long, short, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new tournament snapshot
    Init {
        /// Event configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rounds: Option<u32>,
        /// Register a player (repeatable); replaces the configured list
        #[arg(long = "player")]
        players: Vec<String>,
    },
    /// Pair the current round
    Pair,
    /// Report game points for a match of the current round
    Report {
        match_id: String,
        player1_points: u32,
        player2_points: u32,
    },
    /// Declare a match of the current round drawn
    Draw { match_id: String },
    /// Close the current round and move to the next one
    Advance,
    /// Show the leaderboard
    Standings,
    /// Show the pairings of a round (default: current)
    Pairings {
        #[arg(long)]
        round: Option<u32>,
    },
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init(
    state: Option<PathBuf>,
    config: Option<PathBuf>,
    name: Option<String>,
    rounds: Option<u32>,
    players: Vec<String>,
) -> Result<()> {
    let mut event = match &config {
        Some(path) => EventConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EventConfig::default(),
    };
    if let Some(name) = name {
        event.name = name;
    }
    if rounds.is_some() {
        event.rounds = rounds;
    }
    if !players.is_empty() {
        event.players = players;
    }

    let path = state.unwrap_or_else(|| event.state_file.clone());
    let tournament = event.build_tournament()?;
    create(&path, &tournament)?;

    info!(
        tournament = %tournament.id,
        players = tournament.participants.len(),
        rounds = tournament.total_rounds,
        "created tournament"
    );
    println!(
        "Created {} ({} players, {} rounds) in {}",
        tournament.name,
        tournament.participants.len(),
        tournament.total_rounds,
        path.display()
    );
    Ok(())
}

/// Load, apply `op`, save
fn update(path: &Path, op: impl FnOnce(&mut Tournament) -> Result<()>) -> Result<Tournament> {
    let mut tournament = load(path)?;
    op(&mut tournament)?;
    save(path, &tournament)?;
    Ok(tournament)
}

fn main() -> Result<()> {
    setup_tracing();
    let Cli { state, command } = Cli::parse();
    let snapshot = state
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

    match command {
        Command::Init {
            config,
            name,
            rounds,
            players,
        } => init(state, config, name, rounds, players)?,
        Command::Pair => {
            let t = update(&snapshot, |t| {
                t.start_round().context("pairing round")?;
                Ok(())
            })?;
            print!("{}", pairings_table(&t, t.current_round));
        }
        Command::Report {
            match_id,
            player1_points,
            player2_points,
        } => {
            let t = update(&snapshot, |t| {
                t.report_points(&match_id, player1_points, player2_points)
                    .with_context(|| format!("reporting {}", match_id))?;
                Ok(())
            })?;
            print!("{}", pairings_table(&t, t.current_round));
        }
        Command::Draw { match_id } => {
            let t = update(&snapshot, |t| {
                t.declare_result(&match_id, MatchResult::Draw)
                    .with_context(|| format!("declaring {} drawn", match_id))?;
                Ok(())
            })?;
            print!("{}", pairings_table(&t, t.current_round));
        }
        Command::Advance => {
            let t = update(&snapshot, |t| {
                t.advance_round().context("advancing round")?;
                Ok(())
            })?;
            print!("{}", standings_table(&t.standings()?));
        }
        Command::Standings => {
            let t = load(&snapshot)?;
            print!("{}", standings_table(&t.standings()?));
        }
        Command::Pairings { round } => {
            let t = load(&snapshot)?;
            print!("{}", pairings_table(&t, round.unwrap_or(t.current_round)));
        }
    }

    Ok(())
}
