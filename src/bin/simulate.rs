use chrono::{SecondsFormat, Utc};
use clap::Parser;
use packman_core::config::GameConfig;
use packman_core::engine::{choose_direction, GameSession};
use packman_core::error::{ConfigError, GameError, SetupError};
use packman_core::types::{GameState, RuntimeEvent, Signal, StepInput};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Maximum simulation steps per run.
    #[arg(long, default_value_t = 5_000)]
    steps: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    runs: usize,
    /// JSON file with `GameConfig` overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level template file; the classic board is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("failed to read level {path}: {source}")]
    LevelFile { path: PathBuf, source: io::Error },
}

#[derive(Clone, Debug, Serialize)]
struct RunResultLine {
    run: usize,
    seed: u64,
    steps: usize,
    #[serde(rename = "finalState")]
    final_state: GameState,
    score: u32,
    #[serde(rename = "highScore")]
    high_score: u32,
    level: u32,
    lives: u32,
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "pelletsEaten")]
    pellets_eaten: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    #[serde(rename = "simulatedMs")]
    simulated_ms: u64,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct RunOutcome {
    #[serde(flatten)]
    result: RunResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "runCount")]
    run_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "stateCounts")]
    state_counts: BTreeMap<String, usize>,
    runs: Vec<RunResultLine>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let started_at = Utc::now();
    let base_seed = cli
        .seed
        .unwrap_or_else(|| started_at.timestamp_millis().unsigned_abs());
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(base_seed, started_at.timestamp_millis()));

    let (config, template) = match load_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(error) => {
            error!(%error, "setup failed");
            std::process::exit(2);
        }
    };

    let mut has_anomaly = false;
    let mut results = Vec::new();
    let mut state_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for run in 0..cli.runs.max(1) {
        let seed = base_seed.wrapping_add(run as u64);
        let run_config = GameConfig {
            seed,
            ..config.clone()
        };
        info!(%run_id, run, seed, steps = cli.steps, "run started");

        let outcome = match run_once(run, run_config, template.as_deref(), cli.steps) {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(%run_id, run, %error, "run failed");
                std::process::exit(2);
            }
        };

        for anomaly in &outcome.anomaly_records {
            warn!(%run_id, run, tick = anomaly.tick, detail = %anomaly.message, "anomaly detected");
        }
        if !outcome.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += outcome.anomaly_records.len();
        *state_counts
            .entry(state_key(outcome.result.final_state).to_string())
            .or_insert(0) += 1;

        info!(
            %run_id,
            run,
            score = outcome.result.score,
            level = outcome.result.level,
            state = state_key(outcome.result.final_state),
            "run finished"
        );
        match serde_json::to_string(&outcome.result) {
            Ok(line) => println!("{line}"),
            Err(error) => error!(%error, "failed to serialize run result"),
        }
        results.push(outcome.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        results,
        state_counts,
        total_anomalies,
    );

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            error!(path = %path.display(), %error, "summary write failed");
            std::process::exit(2);
        }
        info!(path = %path.display(), "summary written");
    }

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_inputs(cli: &Cli) -> Result<(GameConfig, Option<String>), SimError> {
    let config = match cli.config.as_deref() {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };
    let template = match cli.level.as_ref() {
        Some(path) => Some(
            std::fs::read_to_string(path).map_err(|source| SimError::LevelFile {
                path: path.clone(),
                source,
            })?,
        ),
        None => None,
    };
    Ok((config, template))
}

fn run_once(
    run: usize,
    config: GameConfig,
    template: Option<&str>,
    max_steps: usize,
) -> Result<RunOutcome, SimError> {
    let seed = config.seed;
    let respawn_delay_ms = config.respawn_delay_ms;
    let starting_lives = config.starting_lives;
    let mut session = match template {
        Some(text) => GameSession::with_template(config, text)?,
        None => GameSession::new(config)?,
    };
    session.handle_signal(Signal::Start)?;

    let mut steps = 0usize;
    let mut simulated_ms = 0u64;
    let mut dots_eaten = 0;
    let mut pellets_eaten = 0;
    let mut deaths = 0;
    let mut levels_cleared = 0;
    let mut last_score = 0u32;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    while steps < max_steps {
        match session.state() {
            GameState::Playing => {}
            GameState::Dying => {
                simulated_ms += respawn_delay_ms;
                session.handle_signal(Signal::Respawn)?;
                continue;
            }
            _ => break,
        }

        let interval = session.step_interval_ms();
        let direction = choose_direction(&session);
        let report = session.step(StepInput {
            direction: Some(direction),
        })?;
        steps += 1;
        simulated_ms += interval;

        for event in &report.events {
            match event {
                RuntimeEvent::DotEaten { .. } => dots_eaten += 1,
                RuntimeEvent::PelletEaten { .. } => pellets_eaten += 1,
                RuntimeEvent::PlayerDied { .. } => deaths += 1,
                RuntimeEvent::LevelCleared { .. } => levels_cleared += 1,
                _ => {}
            }
        }

        for message in collect_session_anomalies(&session, last_score, starting_lives) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                report.tick,
                message,
            );
        }
        last_score = session.score();
    }

    Ok(RunOutcome {
        result: RunResultLine {
            run,
            seed,
            steps,
            final_state: session.state(),
            score: session.score(),
            high_score: session.high_score(),
            level: session.level(),
            lives: session.lives(),
            dots_eaten,
            pellets_eaten,
            ghosts_eaten: session.ghosts_eaten(),
            deaths,
            levels_cleared,
            simulated_ms,
            anomalies,
        },
        anomaly_records,
    })
}

fn collect_session_anomalies(
    session: &GameSession,
    last_score: u32,
    starting_lives: u32,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    if session.score() < last_score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            last_score,
            session.score()
        ));
    }

    let total = session.maze().total_dots();
    if session.dots_collected() > total {
        anomalies.push(format!(
            "collected dots exceed total: {}/{}",
            session.dots_collected(),
            total
        ));
    }
    if session.dots_collected() + session.maze().remaining_dots() != total {
        anomalies.push(format!(
            "dot bookkeeping drift: collected {} + remaining {} != {}",
            session.dots_collected(),
            session.maze().remaining_dots(),
            total
        ));
    }

    if session.lives() > starting_lives {
        anomalies.push(format!("lives above start: {}", session.lives()));
    }
    if session.high_score() < session.score() {
        anomalies.push("high score below score".to_string());
    }
    anomalies
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u64, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn state_key(state: GameState) -> &'static str {
    match state {
        GameState::Ready => "ready",
        GameState::Playing => "playing",
        GameState::Paused => "paused",
        GameState::Dying => "dying",
        GameState::GameOver => "game_over",
        GameState::Win => "win",
    }
}

fn build_run_summary(
    run_id: String,
    started_at: String,
    finished_at: String,
    runs: Vec<RunResultLine>,
    state_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let run_count = runs.len();
    let average_score = if run_count == 0 {
        0
    } else {
        let total: u64 = runs.iter().map(|run| run.score as u64).sum();
        (total / run_count as u64) as u32
    };
    RunSummary {
        run_id,
        started_at,
        finished_at,
        run_count,
        anomaly_count,
        average_score,
        state_counts,
        runs,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)
}
