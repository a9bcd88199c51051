// ABOUTME: Shared test utilities for form-analysis integration tests
// ABOUTME: Provides logging setup, synthetic pose-sample generators, and a stub scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]
//! Shared test utilities for `pierre_form_analysis`

use async_trait::async_trait;
use pierre_form_analysis::config::SessionConfig;
use pierre_form_analysis::form_analysis::scoring::{
    FormScorer, ScoreRequest, ScoreResult, ScoreSource, ScorerError,
};
use pierre_form_analysis::models::{Landmark, Point3, PoseSample};
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Interval between synthetic samples, matching a 10 Hz producer
pub const SAMPLE_STEP_MS: u64 = 100;

/// Resting hip height of the synthetic athlete
pub const NEUTRAL_HIP_Y: f32 = 0.5;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Default tuning without the countdown
pub fn immediate_config() -> SessionConfig {
    SessionConfig {
        countdown_seconds: 0,
        ..SessionConfig::default()
    }
}

/// Full-body sample standing upright with the hips at `hip_y`
pub fn full_body_sample(timestamp_ms: u64, hip_y: f32) -> PoseSample {
    let shoulder_y = hip_y - 0.25;
    let elbow_y = shoulder_y + 0.12;
    let knee_y = (hip_y + 0.8) / 2.0;
    PoseSample::new(timestamp_ms)
        .with_landmark(Landmark::Nose, Point3::new(0.5, shoulder_y - 0.1, 0.0))
        .with_landmark(Landmark::LeftShoulder, Point3::new(0.42, shoulder_y, 0.0))
        .with_landmark(Landmark::RightShoulder, Point3::new(0.58, shoulder_y, 0.0))
        .with_landmark(Landmark::LeftElbow, Point3::new(0.4, elbow_y, 0.0))
        .with_landmark(Landmark::RightElbow, Point3::new(0.6, elbow_y, 0.0))
        .with_landmark(Landmark::LeftWrist, Point3::new(0.4, elbow_y + 0.12, 0.0))
        .with_landmark(Landmark::RightWrist, Point3::new(0.6, elbow_y + 0.12, 0.0))
        .with_landmark(Landmark::LeftHip, Point3::new(0.45, hip_y, 0.0))
        .with_landmark(Landmark::RightHip, Point3::new(0.55, hip_y, 0.0))
        .with_landmark(Landmark::LeftKnee, Point3::new(0.44, knee_y, 0.0))
        .with_landmark(Landmark::RightKnee, Point3::new(0.56, knee_y, 0.0))
        .with_landmark(Landmark::LeftAnkle, Point3::new(0.44, 0.8, 0.0))
        .with_landmark(Landmark::RightAnkle, Point3::new(0.56, 0.8, 0.0))
}

/// Sample with only a face detected, invalid for every exercise
pub fn face_only_sample(timestamp_ms: u64) -> PoseSample {
    PoseSample::new(timestamp_ms).with_landmark(Landmark::Nose, Point3::new(0.5, 0.2, 0.0))
}

/// Shoulders and hips only, as a camera framing just the runner's torso reports
pub fn torso_sample(timestamp_ms: u64) -> PoseSample {
    let shoulder_y = NEUTRAL_HIP_Y - 0.25;
    PoseSample::new(timestamp_ms)
        .with_landmark(Landmark::LeftShoulder, Point3::new(0.42, shoulder_y, 0.0))
        .with_landmark(Landmark::RightShoulder, Point3::new(0.58, shoulder_y, 0.0))
        .with_landmark(Landmark::LeftHip, Point3::new(0.45, NEUTRAL_HIP_Y, 0.0))
        .with_landmark(Landmark::RightHip, Point3::new(0.55, NEUTRAL_HIP_Y, 0.0))
}

/// `count` torso-only samples starting at `start_ms`
pub fn torso_samples(count: usize, start_ms: u64) -> Vec<PoseSample> {
    (0..count as u64)
        .map(|i| torso_sample(start_ms + i * SAMPLE_STEP_MS))
        .collect()
}

/// `count` motionless valid samples starting at `start_ms`
pub fn still_samples(count: usize, start_ms: u64) -> Vec<PoseSample> {
    (0..count as u64)
        .map(|i| full_body_sample(start_ms + i * SAMPLE_STEP_MS, NEUTRAL_HIP_Y))
        .collect()
}

/// `count` invalid samples starting at `start_ms`
pub fn face_only_samples(count: usize, start_ms: u64) -> Vec<PoseSample> {
    (0..count as u64)
        .map(|i| face_only_sample(start_ms + i * SAMPLE_STEP_MS))
        .collect()
}

/// Hip heights of a sinusoid around the neutral height
///
/// `neutral` motionless readings come first so the history mean settles,
/// then `cycles` full periods of `period` samples each.
pub fn squat_hip_heights(neutral: usize, cycles: usize, period: usize, amplitude: f32) -> Vec<f32> {
    let mut heights = vec![NEUTRAL_HIP_Y; neutral];
    heights.extend((0..cycles * period).map(|i| {
        let phase = TAU * (i % period) as f32 / period as f32;
        amplitude.mul_add(phase.sin(), NEUTRAL_HIP_Y)
    }));
    heights
}

/// Samples for a sequence of hip heights, 100 ms apart starting at `start_ms`
pub fn samples_from_heights(heights: &[f32], start_ms: u64) -> Vec<PoseSample> {
    heights
        .iter()
        .enumerate()
        .map(|(i, hip_y)| full_body_sample(start_ms + i as u64 * SAMPLE_STEP_MS, *hip_y))
        .collect()
}

/// Squat set: 10 neutral samples then `cycles` reps of `period` samples
pub fn squat_set(cycles: usize, period: usize) -> Vec<PoseSample> {
    samples_from_heights(&squat_hip_heights(10, cycles, period, 0.15), 0)
}

/// Result a remote scorer would plausibly return
pub fn remote_result(score: u8, reps: u32, frames: usize) -> ScoreResult {
    ScoreResult {
        overall_score: score,
        form_issues: Vec::new(),
        reps_counted: reps,
        frames_analyzed: frames,
        source: ScoreSource::Remote,
        summary: format!("stub score {score}"),
    }
}

/// Scorer double returning a fixed outcome after an optional delay
pub struct StubScorer {
    outcome: Result<ScoreResult, ScorerError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ScoreRequest>>,
}

impl StubScorer {
    pub fn succeeding(score: u8) -> Self {
        Self::with_outcome(Ok(remote_result(score, 0, 0)))
    }

    pub fn failing(error: ScorerError) -> Self {
        Self::with_outcome(Err(error))
    }

    pub fn with_outcome(outcome: Result<ScoreResult, ScorerError>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ScoreRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormScorer for StubScorer {
    async fn score_samples(&self, request: ScoreRequest) -> Result<ScoreResult, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "stub-scorer"
    }
}
