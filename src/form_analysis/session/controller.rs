// ABOUTME: Synchronous session state machine routing pose samples through validation and detection
// ABOUTME: Operations mutate owned state and return effects for the driving event loop to perform
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Controller
//!
//! Owns the sample buffer, rep detector, and quality grade for one
//! exercise session and moves it through
//! `Idle -> Countdown -> Collecting -> Analyzing -> Complete`.
//!
//! The controller never awaits. Anything that needs time or I/O (the
//! countdown ticker, scorer calls, passive estimates) is returned as a
//! [`SessionEffect`] and its outcome is fed back through
//! [`SessionController::countdown_tick`], [`SessionController::complete_analysis`]
//! or [`SessionController::record_live_estimate`]. Every reset bumps the
//! epoch so late outcomes from an earlier session are dropped.

use super::error::{DiagnosticContext, SessionError};
use super::phase::SessionPhase;
use super::snapshot::SessionSnapshot;
use crate::config::SessionConfig;
use crate::form_analysis::quality::{counts_reps, QualityClassifier, QualityGrade};
use crate::form_analysis::rep_detector::RepDetector;
use crate::form_analysis::sample_buffer::SampleBuffer;
use crate::form_analysis::scoring::{
    CapturedFrame, LocalFormScorer, ScoreRequest, ScoreResult, ScorerError,
};
use crate::form_analysis::validator::{SampleValidator, SampleVerdict};
use pierre_core::models::{ExerciseKind, PoseSample, SessionMode};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What started an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTrigger {
    /// The user asked for it
    Explicit,
    /// Enough data or invalid-frame starvation
    AutoComplete,
}

/// Work the controller needs its driver to perform
#[derive(Debug, Clone)]
pub enum SessionEffect {
    /// Start ticking once per second
    CountdownStarted {
        /// Ticks until collection begins
        seconds: u32,
    },
    /// Stop the countdown ticker
    CountdownCancelled,
    /// Call the scorer exactly once and report back with the same epoch
    RequestScore {
        /// Session epoch the request belongs to
        epoch: u64,
        /// Buffered data to score
        request: ScoreRequest,
        /// What started the analysis
        trigger: AnalysisTrigger,
    },
    /// Compute a cheap single-frame estimate of the latest sample
    PassiveEstimate {
        /// Session epoch the estimate belongs to
        epoch: u64,
        /// Latest buffered sample
        sample: PoseSample,
    },
}

/// Single-owner state machine for one form-analysis session
#[derive(Debug)]
pub struct SessionController {
    config: SessionConfig,
    classifier: QualityClassifier,
    detector: RepDetector,
    buffer: SampleBuffer,
    fallback_scorer: LocalFormScorer,
    exercise: ExerciseKind,
    mode: SessionMode,
    phase: SessionPhase,
    countdown_remaining: u32,
    consecutive_invalid_frames: u32,
    accepted_since_reset: u64,
    reps_detected: u32,
    data_quality: QualityGrade,
    camera_active: bool,
    pose_detected: bool,
    current_sample: Option<PoseSample>,
    error: Option<SessionError>,
    live_estimate: Option<ScoreResult>,
    result: Option<ScoreResult>,
    pending_trigger: Option<AnalysisTrigger>,
    session_id: Uuid,
    epoch: u64,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionController {
    /// Create an idle controller for the default exercise and mode
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            classifier: QualityClassifier::new(&config),
            detector: RepDetector::new(&config),
            buffer: SampleBuffer::new(config.buffer_capacity),
            fallback_scorer: LocalFormScorer::new(),
            exercise: ExerciseKind::default(),
            mode: SessionMode::default(),
            phase: SessionPhase::Idle,
            countdown_remaining: 0,
            consecutive_invalid_frames: 0,
            accepted_since_reset: 0,
            reps_detected: 0,
            data_quality: QualityGrade::Insufficient,
            camera_active: false,
            pose_detected: false,
            current_sample: None,
            error: None,
            live_estimate: None,
            result: None,
            pending_trigger: None,
            session_id: Uuid::new_v4(),
            epoch: 0,
            config,
        }
    }

    /// Create an idle controller for a given exercise and mode
    #[must_use]
    pub fn with_selection(
        config: SessionConfig,
        exercise: ExerciseKind,
        mode: SessionMode,
    ) -> Self {
        let mut controller = Self::new(config);
        controller.exercise = exercise;
        controller.mode = mode;
        controller
    }

    /// Reset to a fresh countdown, whatever the current phase
    pub fn start_analysis(&mut self) -> Vec<SessionEffect> {
        let mut effects = self.reset();
        let seconds = self.config.countdown_seconds;
        if seconds == 0 {
            self.enter_collecting();
        } else {
            self.phase = SessionPhase::Countdown;
            self.countdown_remaining = seconds;
            info!(
                session_id = %self.session_id,
                exercise = %self.exercise,
                mode = %self.mode,
                seconds,
                "Countdown started"
            );
            effects.push(SessionEffect::CountdownStarted { seconds });
        }
        effects
    }

    /// Advance the countdown by one second and return the seconds left
    ///
    /// Ignored outside the countdown phase. Reaching zero starts collection.
    pub fn countdown_tick(&mut self) -> u32 {
        if self.phase != SessionPhase::Countdown {
            debug!(phase = %self.phase, "Ignoring countdown tick outside countdown");
            return 0;
        }
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.enter_collecting();
        }
        self.countdown_remaining
    }

    /// Abandon the session and return to idle
    pub fn stop_analysis(&mut self) -> Vec<SessionEffect> {
        info!(session_id = %self.session_id, phase = %self.phase, "Session stopped");
        self.reset()
    }

    /// Clear every buffer and counter and return to idle
    pub fn reset(&mut self) -> Vec<SessionEffect> {
        let was_counting_down = self.phase == SessionPhase::Countdown;

        self.buffer.clear();
        self.detector.reset();
        self.phase = SessionPhase::Idle;
        self.countdown_remaining = 0;
        self.consecutive_invalid_frames = 0;
        self.accepted_since_reset = 0;
        self.reps_detected = 0;
        self.data_quality = QualityGrade::Insufficient;
        self.camera_active = false;
        self.pose_detected = false;
        self.current_sample = None;
        self.error = None;
        self.live_estimate = None;
        self.result = None;
        self.pending_trigger = None;
        self.session_id = Uuid::new_v4();
        self.epoch += 1;

        debug!(session_id = %self.session_id, epoch = self.epoch, "Session reset");

        if was_counting_down {
            vec![SessionEffect::CountdownCancelled]
        } else {
            Vec::new()
        }
    }

    /// Route one pose sample
    ///
    /// The display sample and `pose_detected` always update. Only the
    /// collecting phase validates, buffers, counts reps, and checks for
    /// auto-completion.
    pub fn on_pose_sample(&mut self, sample: PoseSample) -> Vec<SessionEffect> {
        self.camera_active = true;
        self.pose_detected = !sample.is_empty();

        if !self.phase.accepts_samples() {
            self.current_sample = Some(sample);
            return Vec::new();
        }

        let verdict = SampleValidator::check(&sample, self.exercise, self.mode);
        if !verdict.is_valid() {
            self.current_sample = Some(sample);
            return self.on_invalid_sample(verdict);
        }

        self.consecutive_invalid_frames = 0;
        if self.mode.is_gym() {
            let before = self.reps_detected;
            self.reps_detected = self.detector.observe(&sample, self.exercise);
            if self.reps_detected > before {
                info!(
                    session_id = %self.session_id,
                    exercise = %self.exercise,
                    reps = self.reps_detected,
                    "Rep counted"
                );
            }
        }
        self.buffer.push(sample.clone());
        self.current_sample = Some(sample);
        self.accepted_since_reset += 1;
        self.refresh_quality();

        if self.classifier.should_auto_complete(
            self.buffer.len(),
            self.reps_detected,
            self.exercise,
            self.mode,
        ) {
            info!(
                session_id = %self.session_id,
                frames = self.buffer.len(),
                reps = self.reps_detected,
                "Collection target reached, auto-completing"
            );
            return vec![self.begin_analysis(AnalysisTrigger::AutoComplete, Vec::new())];
        }

        self.passive_estimate().into_iter().collect()
    }

    fn on_invalid_sample(&mut self, verdict: SampleVerdict) -> Vec<SessionEffect> {
        self.consecutive_invalid_frames = self.consecutive_invalid_frames.saturating_add(1);
        debug!(
            exercise = %self.exercise,
            verdict = ?verdict,
            consecutive = self.consecutive_invalid_frames,
            "Dropped invalid sample"
        );

        let starved =
            self.consecutive_invalid_frames >= self.config.max_consecutive_invalid_frames;
        if starved
            && self.classifier.is_sufficient(
                self.buffer.len(),
                self.reps_detected,
                self.exercise,
                self.mode,
            )
        {
            info!(
                session_id = %self.session_id,
                invalid_frames = self.consecutive_invalid_frames,
                frames = self.buffer.len(),
                "Pose lost after sufficient data, auto-completing"
            );
            return vec![self.begin_analysis(AnalysisTrigger::AutoComplete, Vec::new())];
        }
        Vec::new()
    }

    fn passive_estimate(&self) -> Option<SessionEffect> {
        let interval = self.config.passive_analysis_interval;
        if interval == 0
            || !self.accepted_since_reset.is_multiple_of(interval)
            || self.buffer.len() < self.classifier.min_frames()
        {
            return None;
        }
        self.buffer
            .latest()
            .map(|sample| SessionEffect::PassiveEstimate {
                epoch: self.epoch,
                sample: sample.clone(),
            })
    }

    /// Request a full analysis of the buffered data
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` while analyzing or complete, `NoPoseDetected`
    /// for an empty buffer, `InsufficientFrames` below the frame minimum,
    /// and `InsufficientReps` when a rep-based exercise has no reps. The
    /// phase and buffers are left untouched on error.
    pub fn capture_and_analyze(
        &mut self,
        captured_frames: Vec<CapturedFrame>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if matches!(self.phase, SessionPhase::Analyzing | SessionPhase::Complete) {
            return Err(SessionError::InvalidPhase {
                operation: "capture and analyze",
                phase: self.phase,
            });
        }

        if let Some(error) = self.precondition_error() {
            warn!(
                session_id = %self.session_id,
                error = %error,
                frames = self.buffer.len(),
                reps = self.reps_detected,
                "Analysis preconditions not met"
            );
            self.error = Some(error.clone());
            return Err(error);
        }

        if counts_reps(self.exercise, self.mode) && self.reps_detected < self.classifier.min_reps()
        {
            warn!(
                session_id = %self.session_id,
                reps = self.reps_detected,
                recommended = self.classifier.min_reps(),
                "Analyzing with fewer reps than recommended"
            );
        }

        Ok(vec![self.begin_analysis(AnalysisTrigger::Explicit, captured_frames)])
    }

    fn precondition_error(&self) -> Option<SessionError> {
        let context = self.diagnostic_context();
        let collected = self.buffer.len();
        let required_frames = self.classifier.min_frames();

        if collected == 0 {
            Some(SessionError::NoPoseDetected { context })
        } else if collected < required_frames {
            Some(SessionError::InsufficientFrames {
                collected,
                required: required_frames,
                context,
            })
        } else if counts_reps(self.exercise, self.mode) && self.reps_detected == 0 {
            Some(SessionError::InsufficientReps {
                detected: 0,
                required: 1,
                context,
            })
        } else {
            None
        }
    }

    fn begin_analysis(
        &mut self,
        trigger: AnalysisTrigger,
        captured_frames: Vec<CapturedFrame>,
    ) -> SessionEffect {
        self.phase = SessionPhase::Analyzing;
        self.pending_trigger = Some(trigger);
        self.error = None;

        info!(
            session_id = %self.session_id,
            trigger = ?trigger,
            frames = self.buffer.len(),
            reps = self.reps_detected,
            captured = captured_frames.len(),
            "Analyzing session"
        );

        SessionEffect::RequestScore {
            epoch: self.epoch,
            request: ScoreRequest {
                samples: self.buffer.to_vec(),
                captured_frames,
                exercise: self.exercise,
                mode: self.mode,
                reps_detected: self.reps_detected,
            },
            trigger,
        }
    }

    /// Apply a scorer outcome, returning false if it was stale
    ///
    /// Success completes the session. A failed explicit analysis resets to
    /// idle with the error set; a failed auto-completion falls back to a
    /// local estimate of the last buffered sample and completes.
    pub fn complete_analysis(
        &mut self,
        epoch: u64,
        scorer: &'static str,
        outcome: Result<ScoreResult, ScorerError>,
    ) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::Analyzing {
            debug!(
                epoch,
                current_epoch = self.epoch,
                phase = %self.phase,
                "Discarding stale analysis outcome"
            );
            return false;
        }

        let trigger = self
            .pending_trigger
            .take()
            .unwrap_or(AnalysisTrigger::Explicit);

        match outcome {
            Ok(result) => {
                info!(
                    session_id = %self.session_id,
                    scorer,
                    score = result.overall_score,
                    issues = result.form_issues.len(),
                    "Analysis complete"
                );
                self.finish(result);
            }
            Err(source) => {
                let fallback = match trigger {
                    AnalysisTrigger::AutoComplete => self.buffer.latest().map(|last| {
                        self.fallback_scorer
                            .estimate_frame(last, self.exercise, self.reps_detected)
                    }),
                    AnalysisTrigger::Explicit => None,
                };

                if let Some(fallback) = fallback {
                    warn!(
                        session_id = %self.session_id,
                        scorer,
                        error = %source,
                        "Scorer failed, falling back to local estimate"
                    );
                    self.finish(fallback);
                } else {
                    warn!(
                        session_id = %self.session_id,
                        scorer,
                        error = %source,
                        "Scorer failed, resetting session"
                    );
                    self.reset();
                    self.error = Some(SessionError::ScorerFailed { scorer, source });
                }
            }
        }
        true
    }

    fn finish(&mut self, result: ScoreResult) {
        self.phase = SessionPhase::Complete;
        self.result = Some(result);
    }

    /// Store a passive single-frame estimate, returning false if it was stale
    pub fn record_live_estimate(&mut self, epoch: u64, estimate: ScoreResult) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::Collecting {
            return false;
        }
        debug!(score = estimate.overall_score, "Live estimate updated");
        self.live_estimate = Some(estimate);
        true
    }

    /// Select the exercise; a change resets the session
    pub fn set_exercise_kind(&mut self, exercise: ExerciseKind) -> Vec<SessionEffect> {
        if exercise == self.exercise {
            return Vec::new();
        }
        info!(from = %self.exercise, to = %exercise, "Exercise changed");
        self.exercise = exercise;
        self.reset()
    }

    /// Select the mode; a change resets the session
    pub fn set_mode(&mut self, mode: SessionMode) -> Vec<SessionEffect> {
        if mode == self.mode {
            return Vec::new();
        }
        info!(from = %self.mode, to = %mode, "Mode changed");
        self.mode = mode;
        self.reset()
    }

    fn enter_collecting(&mut self) {
        self.phase = SessionPhase::Collecting;
        self.countdown_remaining = 0;
        info!(
            session_id = %self.session_id,
            exercise = %self.exercise,
            mode = %self.mode,
            "Collecting pose samples"
        );
    }

    fn refresh_quality(&mut self) {
        let grade = self.classifier.classify(
            self.buffer.len(),
            self.reps_detected,
            self.exercise,
            self.mode,
        );
        if grade != self.data_quality {
            debug!(from = %self.data_quality, to = %grade, "Data quality changed");
        }
        self.data_quality = grade;
    }

    fn diagnostic_context(&self) -> DiagnosticContext {
        DiagnosticContext {
            frames_collected: self.buffer.len(),
            reps_detected: self.reps_detected,
            phase: self.phase,
            camera_active: self.camera_active,
        }
    }

    /// Copy the observable state
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            exercise: self.exercise,
            mode: self.mode,
            countdown_seconds_remaining: self.countdown_remaining,
            frames_collected: self.buffer.len(),
            reps_detected: self.reps_detected,
            data_quality: self.data_quality,
            pose_detected: self.pose_detected,
            current_sample: self.current_sample.clone(),
            error: self.error.clone(),
            live_estimate: self.live_estimate.clone(),
            result: self.result.clone(),
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Selected exercise
    #[must_use]
    pub const fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    /// Selected mode
    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Identifier regenerated on every reset
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Counter bumped on every reset
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Buffered valid samples
    #[must_use]
    pub fn frames_collected(&self) -> usize {
        self.buffer.len()
    }

    /// Reps counted
    #[must_use]
    pub const fn reps_detected(&self) -> u32 {
        self.reps_detected
    }

    /// Current data-quality grade
    #[must_use]
    pub const fn data_quality(&self) -> QualityGrade {
        self.data_quality
    }

    /// Invalid samples in a row while collecting
    #[must_use]
    pub const fn consecutive_invalid_frames(&self) -> u32 {
        self.consecutive_invalid_frames
    }

    /// Whether the tracked joints are moving beyond the threshold
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.detector.is_moving()
    }

    /// Tuning values in use
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}
