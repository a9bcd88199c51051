// ABOUTME: Tokio task owning a session controller and driving its countdown and scorer calls
// ABOUTME: Clients talk to it through a cloneable handle and observe state via a watch channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Actor
//!
//! One task per session processes commands strictly in order, so a sample
//! is fully validated, buffered and classified before the next one is
//! looked at. Scorer calls run on a spawned task and report back through
//! an internal channel, which keeps `stop_analysis` responsive while a
//! slow scorer is working. Every state change publishes a fresh
//! [`SessionSnapshot`].

use super::controller::{SessionController, SessionEffect};
use super::error::SessionError;
use super::phase::SessionPhase;
use super::snapshot::SessionSnapshot;
use crate::config::SessionConfig;
use crate::form_analysis::scoring::{
    CapturedFrame, FormScorer, LocalFormScorer, ScoreResult, ScorerError,
};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::{ExerciseKind, PoseSample, SessionMode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Pending commands before senders wait
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Countdown tick period
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

type Reply<T> = oneshot::Sender<T>;

enum SessionCommand {
    PoseSample {
        sample: PoseSample,
        reply: Reply<()>,
    },
    StartAnalysis {
        reply: Reply<()>,
    },
    StopAnalysis {
        reply: Reply<()>,
    },
    CaptureAndAnalyze {
        frames: Vec<CapturedFrame>,
        reply: Reply<Result<(), SessionError>>,
    },
    SetExerciseKind {
        exercise: ExerciseKind,
        reply: Reply<()>,
    },
    SetMode {
        mode: SessionMode,
        reply: Reply<()>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}

struct ScoreOutcome {
    epoch: u64,
    outcome: Result<ScoreResult, ScorerError>,
}

/// Event loop owning one [`SessionController`]
pub struct SessionActor {
    controller: SessionController,
    scorer: Arc<dyn FormScorer>,
    estimator: LocalFormScorer,
    commands: mpsc::Receiver<SessionCommand>,
    outcomes_tx: mpsc::UnboundedSender<ScoreOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<ScoreOutcome>,
    state: watch::Sender<SessionSnapshot>,
    countdown: Option<Interval>,
}

impl SessionActor {
    /// Validate the configuration and start the actor on the current runtime
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation
    pub fn spawn(config: SessionConfig, scorer: Arc<dyn FormScorer>) -> AppResult<SessionHandle> {
        Self::spawn_with_selection(
            config,
            scorer,
            ExerciseKind::default(),
            SessionMode::default(),
        )
    }

    /// Like [`SessionActor::spawn`] with an initial exercise and mode
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation
    pub fn spawn_with_selection(
        config: SessionConfig,
        scorer: Arc<dyn FormScorer>,
        exercise: ExerciseKind,
        mode: SessionMode,
    ) -> AppResult<SessionHandle> {
        config.validate()?;

        let controller = SessionController::with_selection(config, exercise, mode);
        let (state, state_rx) = watch::channel(controller.snapshot());
        let (commands_tx, commands) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        info!(
            exercise = %exercise,
            mode = %mode,
            scorer = scorer.name(),
            "Starting form analysis session actor"
        );

        let actor = Self {
            controller,
            scorer,
            estimator: LocalFormScorer::new(),
            commands,
            outcomes_tx,
            outcomes_rx,
            state,
            countdown: None,
        };
        tokio::spawn(actor.run());

        Ok(SessionHandle {
            commands: commands_tx,
            state: state_rx,
        })
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("All session handles dropped, stopping actor");
                        break;
                    };
                    if !self.handle_command(command) {
                        break;
                    }
                }
                () = next_tick(&mut self.countdown) => {
                    let remaining = self.controller.countdown_tick();
                    debug!(remaining, "Countdown tick");
                    if self.controller.phase() != SessionPhase::Countdown {
                        self.countdown = None;
                    }
                    self.publish();
                }
                Some(ScoreOutcome { epoch, outcome }) = self.outcomes_rx.recv() => {
                    if self.controller.complete_analysis(epoch, self.scorer.name(), outcome) {
                        self.publish();
                    }
                }
            }
        }
        info!("Form analysis session actor stopped");
    }

    /// Apply one command; false means shut down
    ///
    /// The new state is published before the caller is released, so a
    /// snapshot read after any handle call reflects that call.
    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::PoseSample { sample, reply } => {
                let effects = self.controller.on_pose_sample(sample);
                self.apply(effects);
                self.reply(reply, ());
            }
            SessionCommand::StartAnalysis { reply } => {
                let effects = self.controller.start_analysis();
                self.apply(effects);
                self.reply(reply, ());
            }
            SessionCommand::StopAnalysis { reply } => {
                let effects = self.controller.stop_analysis();
                self.apply(effects);
                self.reply(reply, ());
            }
            SessionCommand::CaptureAndAnalyze { frames, reply } => {
                let outcome = self
                    .controller
                    .capture_and_analyze(frames)
                    .map(|effects| self.apply(effects));
                self.reply(reply, outcome);
            }
            SessionCommand::SetExerciseKind { exercise, reply } => {
                let effects = self.controller.set_exercise_kind(exercise);
                self.apply(effects);
                self.reply(reply, ());
            }
            SessionCommand::SetMode { mode, reply } => {
                let effects = self.controller.set_mode(mode);
                self.apply(effects);
                self.reply(reply, ());
            }
            SessionCommand::Shutdown { reply } => {
                self.reply(reply, ());
                return false;
            }
        }
        true
    }

    fn apply(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::CountdownStarted { seconds } => {
                    debug!(seconds, "Arming countdown ticker");
                    let mut ticker = interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.countdown = Some(ticker);
                }
                SessionEffect::CountdownCancelled => {
                    self.countdown = None;
                }
                SessionEffect::RequestScore { epoch, request, .. } => {
                    let scorer = Arc::clone(&self.scorer);
                    let outcomes = self.outcomes_tx.clone();
                    tokio::spawn(async move {
                        let outcome = scorer.score_samples(request).await;
                        if outcomes.send(ScoreOutcome { epoch, outcome }).is_err() {
                            debug!(epoch, "Session actor gone before scorer finished");
                        }
                    });
                }
                SessionEffect::PassiveEstimate { epoch, sample } => {
                    let estimate = self.estimator.estimate_frame(
                        &sample,
                        self.controller.exercise(),
                        self.controller.reps_detected(),
                    );
                    self.controller.record_live_estimate(epoch, estimate);
                }
            }
        }
    }

    fn reply<T>(&self, reply: Reply<T>, value: T) {
        self.publish();
        acknowledge(reply, value);
    }

    fn publish(&self) {
        self.state.send_replace(self.controller.snapshot());
    }
}

async fn next_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn acknowledge<T>(reply: Reply<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Session command caller went away before the reply");
    }
}

fn actor_stopped() -> AppError {
    AppError::invalid_state("Form analysis session is no longer running")
}

/// Cloneable client of a running [`SessionActor`]
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| actor_stopped())?;
        response.await.map_err(|_| actor_stopped())
    }

    /// Deliver one pose sample and wait until it has been processed
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped
    pub async fn on_pose_sample(&self, sample: PoseSample) -> AppResult<()> {
        self.request(|reply| SessionCommand::PoseSample { sample, reply })
            .await
    }

    /// Reset and start the countdown
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped
    pub async fn start_analysis(&self) -> AppResult<()> {
        self.request(|reply| SessionCommand::StartAnalysis { reply })
            .await
    }

    /// Cancel whatever is running and return to idle
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped
    pub async fn stop_analysis(&self) -> AppResult<()> {
        self.request(|reply| SessionCommand::StopAnalysis { reply })
            .await
    }

    /// Request a full analysis with optional captured stills
    ///
    /// Returns once the analysis has been handed to the scorer; watch the
    /// snapshot for the result.
    ///
    /// # Errors
    ///
    /// Returns an `InsufficientData` error when preconditions fail (the
    /// snapshot carries the structured error), `InvalidState` while already
    /// analyzing or if the actor has stopped
    pub async fn capture_and_analyze(&self, frames: Vec<CapturedFrame>) -> AppResult<()> {
        self.request(|reply| SessionCommand::CaptureAndAnalyze { frames, reply })
            .await?
            .map_err(AppError::from)
    }

    /// Select the exercise, resetting the session if it changed
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped
    pub async fn set_exercise_kind(&self, exercise: ExerciseKind) -> AppResult<()> {
        self.request(|reply| SessionCommand::SetExerciseKind { exercise, reply })
            .await
    }

    /// Select the mode, resetting the session if it changed
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped
    pub async fn set_mode(&self, mode: SessionMode) -> AppResult<()> {
        self.request(|reply| SessionCommand::SetMode { mode, reply })
            .await
    }

    /// New receiver of state snapshots
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.clone()
    }

    /// Latest published state
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Wait until the published state satisfies `predicate`
    ///
    /// # Errors
    ///
    /// Returns an error if the actor stops first
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> AppResult<SessionSnapshot> {
        let mut state = self.state.clone();
        let snapshot = state.wait_for(predicate).await.map_err(|_| actor_stopped())?;
        Ok(snapshot.clone())
    }

    /// Stop the actor
    ///
    /// # Errors
    ///
    /// Returns an error if the actor had already stopped
    pub async fn shutdown(&self) -> AppResult<()> {
        self.request(|reply| SessionCommand::Shutdown { reply })
            .await
    }
}
