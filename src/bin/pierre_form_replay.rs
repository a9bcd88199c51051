// ABOUTME: Replays a recorded pose-sample stream through a form analysis session
// ABOUTME: Prints the final score as pretty JSON for inspecting tuning changes offline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Score a recorded squat set
//! pierre-form-replay --input squats.jsonl --exercise squat --mode gym
//!
//! # Replay at the original 10 samples per second, without the countdown
//! pierre-form-replay --input run.jsonl --mode running --sample-interval-ms 100 --skip-countdown
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use pierre_form_analysis::config::SessionConfig;
use pierre_form_analysis::form_analysis::replay::load_pose_samples;
use pierre_form_analysis::form_analysis::scoring::LocalFormScorer;
use pierre_form_analysis::form_analysis::session::{SessionActor, SessionPhase};
use pierre_form_analysis::logging::{LogFormat, LoggingConfig};
use pierre_form_analysis::models::{ExerciseKind, SessionMode};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "pierre-form-replay",
    about = "Replay recorded pose samples through a form analysis session",
    long_about = "Feeds a JSON Lines recording of pose samples into a session, waits for the analysis, and prints the score."
)]
struct Cli {
    /// JSON Lines file with one pose sample per line
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Exercise performed in the recording
    #[arg(long, short = 'e', default_value = "squat")]
    exercise: ExerciseKind,

    /// Session mode (gym or running)
    #[arg(long, short = 'm', default_value = "gym")]
    mode: SessionMode,

    /// Delay between samples; 0 replays as fast as possible
    #[arg(long, default_value_t = 0)]
    sample_interval_ms: u64,

    /// Start collecting immediately
    #[arg(long)]
    skip_countdown: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if env::var("LOG_FORMAT").is_err() {
        logging.format = LogFormat::Compact;
    }
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = SessionConfig::from_env()?;
    if cli.skip_countdown {
        config.countdown_seconds = 0;
    }

    let samples = load_pose_samples(&cli.input)
        .await
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    info!(
        samples = samples.len(),
        exercise = %cli.exercise,
        mode = %cli.mode,
        "Replaying recording"
    );

    let session = SessionActor::spawn_with_selection(
        config,
        Arc::new(LocalFormScorer::new()),
        cli.exercise,
        cli.mode,
    )?;

    session.start_analysis().await?;
    session
        .wait_for(|state| state.phase != SessionPhase::Countdown)
        .await?;

    let mut replayed = 0_usize;
    for sample in samples {
        if session.snapshot().phase != SessionPhase::Collecting {
            break;
        }
        if cli.sample_interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(cli.sample_interval_ms)).await;
        }
        session.on_pose_sample(sample).await?;
        replayed += 1;
    }

    let snapshot = session.snapshot();
    info!(
        replayed,
        frames = snapshot.frames_collected,
        reps = snapshot.reps_detected,
        quality = %snapshot.data_quality,
        "Recording replayed"
    );

    if snapshot.phase == SessionPhase::Collecting {
        warn!("Recording ended before auto-completion, requesting analysis");
        session
            .capture_and_analyze(Vec::new())
            .await
            .context("Analysis rejected")?;
    }

    let finished = session
        .wait_for(|state| {
            state.phase == SessionPhase::Complete
                || (state.phase == SessionPhase::Idle && state.error.is_some())
        })
        .await?;
    session.shutdown().await?;

    let Some(result) = finished.result else {
        match finished.error {
            Some(error) => bail!("Analysis failed: {error}"),
            None => bail!("Analysis finished without a result"),
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
