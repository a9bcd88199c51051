// ABOUTME: Tests for the synchronous session state machine
// ABOUTME: Covers countdown, collection, auto-completion, starvation, preconditions, and scorer outcomes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use bytes::Bytes;
use common::{
    face_only_samples, immediate_config, remote_result, squat_set, still_samples, torso_samples,
};
use pierre_form_analysis::config::SessionConfig;
use pierre_form_analysis::errors::{AppError, ErrorCode};
use pierre_form_analysis::form_analysis::quality::QualityGrade;
use pierre_form_analysis::form_analysis::scoring::{CapturedFrame, ScoreSource, ScorerError};
use pierre_form_analysis::form_analysis::session::{
    AnalysisTrigger, SessionController, SessionEffect, SessionError, SessionPhase,
};
use pierre_form_analysis::models::{ExerciseKind, PoseSample, SessionMode};

fn collecting(exercise: ExerciseKind, mode: SessionMode) -> SessionController {
    let mut controller = SessionController::with_selection(immediate_config(), exercise, mode);
    controller.start_analysis();
    assert_eq!(controller.phase(), SessionPhase::Collecting);
    controller
}

fn feed(controller: &mut SessionController, samples: Vec<PoseSample>) -> Vec<SessionEffect> {
    samples
        .into_iter()
        .flat_map(|sample| controller.on_pose_sample(sample))
        .collect()
}

fn score_requests(effects: &[SessionEffect]) -> Vec<AnalysisTrigger> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            SessionEffect::RequestScore { trigger, .. } => Some(*trigger),
            _ => None,
        })
        .collect()
}

fn request_epoch(effects: &[SessionEffect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            SessionEffect::RequestScore { epoch, .. } => Some(*epoch),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_new_controller_is_idle() {
    let controller = SessionController::default();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.exercise, ExerciseKind::Squat);
    assert_eq!(snapshot.mode, SessionMode::Gym);
    assert_eq!(snapshot.frames_collected, 0);
    assert_eq!(snapshot.data_quality, QualityGrade::Insufficient);
    assert!(!snapshot.pose_detected);
    assert!(snapshot.result.is_none());
}

#[test]
fn test_countdown_runs_to_collecting() {
    let mut controller = SessionController::default();
    let effects = controller.start_analysis();
    assert!(matches!(
        effects.as_slice(),
        [SessionEffect::CountdownStarted { seconds: 5 }]
    ));
    assert_eq!(controller.phase(), SessionPhase::Countdown);
    assert_eq!(controller.snapshot().countdown_seconds_remaining, 5);

    let remaining: Vec<u32> = (0..5).map(|_| controller.countdown_tick()).collect();
    assert_eq!(remaining, vec![4, 3, 2, 1, 0]);
    assert_eq!(controller.phase(), SessionPhase::Collecting);
}

#[test]
fn test_cancelling_countdown_at_tick_three_returns_to_idle() {
    let mut controller = SessionController::default();
    controller.start_analysis();
    for _ in 0..3 {
        controller.countdown_tick();
    }
    assert_eq!(controller.snapshot().countdown_seconds_remaining, 2);
    feed(&mut controller, still_samples(5, 0));

    let effects = controller.stop_analysis();
    assert!(matches!(effects.as_slice(), [SessionEffect::CountdownCancelled]));

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.countdown_seconds_remaining, 0);
    assert_eq!(snapshot.frames_collected, 0);
    assert_eq!(snapshot.reps_detected, 0);
}

#[test]
fn test_ticks_outside_countdown_are_ignored() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    assert_eq!(controller.countdown_tick(), 0);
    assert_eq!(controller.phase(), SessionPhase::Collecting);
}

#[test]
fn test_samples_outside_collecting_only_update_display() {
    let mut controller = SessionController::default();
    let effects = feed(&mut controller, still_samples(3, 0));
    assert!(effects.is_empty());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.frames_collected, 0);
    assert!(snapshot.pose_detected);
    assert_eq!(snapshot.current_sample.unwrap().timestamp_ms(), 200);
}

#[test]
fn test_empty_sample_clears_pose_detected() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, still_samples(1, 0));
    assert!(controller.snapshot().pose_detected);
    controller.on_pose_sample(PoseSample::new(100));
    assert!(!controller.snapshot().pose_detected);
    assert_eq!(controller.frames_collected(), 1);
}

#[test]
fn test_still_squats_never_auto_complete() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    let effects = feed(&mut controller, still_samples(35, 0));

    assert!(score_requests(&effects).is_empty());
    assert_eq!(controller.phase(), SessionPhase::Collecting);
    assert_eq!(controller.frames_collected(), 35);
    assert!(controller.data_quality() <= QualityGrade::Moderate);
    assert_eq!(controller.data_quality(), QualityGrade::Low);
}

#[test]
fn test_five_reps_auto_complete_before_frame_target() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    let samples = squat_set(6, 12);
    assert_eq!(samples.len(), 82);

    let effects = feed(&mut controller, samples);
    assert_eq!(score_requests(&effects), vec![AnalysisTrigger::AutoComplete]);
    assert_eq!(controller.phase(), SessionPhase::Analyzing);
    assert_eq!(controller.reps_detected(), 5);
    assert!(controller.frames_collected() < 80);

    let SessionEffect::RequestScore { request, .. } = effects
        .iter()
        .find(|e| matches!(e, SessionEffect::RequestScore { .. }))
        .unwrap()
    else {
        unreachable!()
    };
    assert_eq!(request.samples.len(), controller.frames_collected());
    assert_eq!(request.reps_detected, 5);
    assert!(request.captured_frames.is_empty());
}

#[test]
fn test_running_frame_target_auto_completes() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    let effects = feed(&mut controller, squat_set(6, 12));
    assert_eq!(score_requests(&effects), vec![AnalysisTrigger::AutoComplete]);
    assert_eq!(controller.frames_collected(), 80);
    assert_eq!(controller.reps_detected(), 0);
}

#[test]
fn test_invalid_frame_starvation_auto_completes() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    assert!(score_requests(&feed(&mut controller, still_samples(40, 0))).is_empty());

    let invalid = face_only_samples(16, 4000);
    let mut triggered_at = None;
    for (index, sample) in invalid.into_iter().enumerate() {
        let effects = controller.on_pose_sample(sample);
        if !score_requests(&effects).is_empty() {
            assert!(triggered_at.is_none(), "analysis requested twice");
            triggered_at = Some(index + 1);
        }
    }

    assert_eq!(triggered_at, Some(15));
    assert_eq!(controller.phase(), SessionPhase::Analyzing);
    assert_eq!(controller.frames_collected(), 40);
}

#[test]
fn test_running_buffers_torso_only_samples() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    let effects = feed(&mut controller, torso_samples(40, 0));
    assert!(score_requests(&effects).is_empty());
    assert_eq!(controller.frames_collected(), 40);
    assert_eq!(controller.consecutive_invalid_frames(), 0);

    let mut invalid = face_only_samples(15, 4000);
    let last = invalid.pop().unwrap();
    assert!(score_requests(&feed(&mut controller, invalid)).is_empty());
    assert_eq!(controller.consecutive_invalid_frames(), 14);

    let effects = controller.on_pose_sample(last);
    assert_eq!(score_requests(&effects), vec![AnalysisTrigger::AutoComplete]);
    assert_eq!(controller.phase(), SessionPhase::Analyzing);
    assert_eq!(controller.frames_collected(), 40);
}

#[test]
fn test_gym_rejects_torso_only_squat_samples() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, torso_samples(10, 0));
    assert_eq!(controller.frames_collected(), 0);
    assert_eq!(controller.consecutive_invalid_frames(), 10);
}

#[test]
fn test_starvation_without_enough_data_keeps_collecting() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(20, 0));
    let effects = feed(&mut controller, face_only_samples(30, 2000));

    assert!(score_requests(&effects).is_empty());
    assert_eq!(controller.phase(), SessionPhase::Collecting);
    assert_eq!(controller.consecutive_invalid_frames(), 30);
    assert_eq!(controller.frames_collected(), 20);
}

#[test]
fn test_starvation_for_gym_squats_needs_reps() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, still_samples(40, 0));
    let effects = feed(&mut controller, face_only_samples(20, 4000));
    assert!(score_requests(&effects).is_empty());
    assert_eq!(controller.phase(), SessionPhase::Collecting);
}

#[test]
fn test_valid_sample_resets_invalid_counter() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(40, 0));
    feed(&mut controller, face_only_samples(14, 4000));
    assert_eq!(controller.consecutive_invalid_frames(), 14);
    feed(&mut controller, still_samples(1, 5400));
    assert_eq!(controller.consecutive_invalid_frames(), 0);

    let effects = feed(&mut controller, face_only_samples(14, 5500));
    assert!(score_requests(&effects).is_empty());
}

#[test]
fn test_capture_with_empty_buffer_reports_no_pose() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    let error = controller.capture_and_analyze(Vec::new()).unwrap_err();

    let SessionError::NoPoseDetected { context } = &error else {
        panic!("unexpected error {error:?}");
    };
    assert_eq!(context.frames_collected, 0);
    assert_eq!(context.phase, SessionPhase::Collecting);
    assert!(!context.camera_active);
    assert_eq!(controller.phase(), SessionPhase::Collecting);
    assert_eq!(controller.snapshot().error, Some(error));
}

#[test]
fn test_capture_with_too_few_frames() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(20, 0));

    let error = controller.capture_and_analyze(Vec::new()).unwrap_err();
    assert!(matches!(
        error,
        SessionError::InsufficientFrames {
            collected: 20,
            required: 30,
            ..
        }
    ));
    assert!(error.context().unwrap().camera_active);

    // Collection continues after the error
    let effects = feed(&mut controller, still_samples(10, 2000));
    assert!(score_requests(&effects).is_empty());
    assert_eq!(controller.frames_collected(), 30);
    assert!(controller.capture_and_analyze(Vec::new()).is_ok());
}

#[test]
fn test_capture_without_reps_for_gym_squats() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, still_samples(35, 0));

    let error = controller.capture_and_analyze(Vec::new()).unwrap_err();
    assert!(matches!(error, SessionError::InsufficientReps { detected: 0, .. }));
    assert_eq!(controller.frames_collected(), 35);

    let app_error = AppError::from(error);
    assert_eq!(app_error.code, ErrorCode::InsufficientData);
    assert_eq!(app_error.context.details["frames_collected"], 35);
}

#[test]
fn test_plank_capture_needs_frames_only() {
    let mut controller = collecting(ExerciseKind::Plank, SessionMode::Gym);
    feed(&mut controller, still_samples(30, 0));
    let effects = controller.capture_and_analyze(Vec::new()).unwrap();
    assert_eq!(score_requests(&effects), vec![AnalysisTrigger::Explicit]);
}

#[test]
fn test_capture_with_a_single_rep_proceeds() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    let mut samples = squat_set(1, 20);
    samples.extend(still_samples(15, 3000));
    feed(&mut controller, samples);
    assert_eq!(controller.reps_detected(), 1);

    let effects = controller.capture_and_analyze(Vec::new()).unwrap();
    assert_eq!(score_requests(&effects), vec![AnalysisTrigger::Explicit]);
    assert_eq!(controller.phase(), SessionPhase::Analyzing);
}

#[test]
fn test_capture_passes_frames_through() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, squat_set(3, 20));
    assert_eq!(controller.reps_detected(), 3);

    let frame = CapturedFrame {
        captured_at_ms: 7000,
        mime_type: "image/jpeg".to_owned(),
        payload: Bytes::from_static(b"\xff\xd8\xff"),
    };
    let effects = controller.capture_and_analyze(vec![frame.clone()]).unwrap();
    let [SessionEffect::RequestScore {
        request, trigger, ..
    }] = effects.as_slice()
    else {
        panic!("expected a single score request");
    };
    assert_eq!(*trigger, AnalysisTrigger::Explicit);
    assert_eq!(request.captured_frames, vec![frame]);
    assert_eq!(request.samples.len(), 70);
    assert_eq!(request.exercise, ExerciseKind::Squat);
}

#[test]
fn test_capture_while_analyzing_is_rejected() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(30, 0));
    controller.capture_and_analyze(Vec::new()).unwrap();

    let error = controller.capture_and_analyze(Vec::new()).unwrap_err();
    assert!(matches!(
        error,
        SessionError::InvalidPhase {
            phase: SessionPhase::Analyzing,
            ..
        }
    ));
}

#[test]
fn test_successful_analysis_completes_session() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(30, 0));
    let epoch = request_epoch(&controller.capture_and_analyze(Vec::new()).unwrap());

    assert!(controller.complete_analysis(epoch, "stub", Ok(remote_result(88, 0, 30))));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Complete);
    assert_eq!(snapshot.result.unwrap().overall_score, 88);

    // Complete ignores further samples
    assert!(feed(&mut controller, still_samples(5, 4000)).is_empty());
    assert_eq!(controller.frames_collected(), 30);
}

#[test]
fn test_stale_outcome_is_discarded() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(30, 0));
    let epoch = request_epoch(&controller.capture_and_analyze(Vec::new()).unwrap());

    controller.start_analysis();
    assert!(!controller.complete_analysis(epoch, "stub", Ok(remote_result(88, 0, 30))));
    assert_eq!(controller.phase(), SessionPhase::Collecting);
    assert!(controller.snapshot().result.is_none());
}

#[test]
fn test_explicit_scorer_failure_resets_to_idle() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    feed(&mut controller, still_samples(30, 0));
    let epoch = request_epoch(&controller.capture_and_analyze(Vec::new()).unwrap());

    let applied = controller.complete_analysis(
        epoch,
        "stub",
        Err(ScorerError::Timeout { after_ms: 30_000 }),
    );
    assert!(applied);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.frames_collected, 0);
    assert!(matches!(
        snapshot.error,
        Some(SessionError::ScorerFailed {
            scorer: "stub",
            source: ScorerError::Timeout { after_ms: 30_000 }
        })
    ));
    assert_eq!(
        AppError::from(snapshot.error.unwrap()).code,
        ErrorCode::ExternalServiceUnavailable
    );
}

#[test]
fn test_auto_complete_scorer_failure_falls_back_to_local_estimate() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    let effects = feed(&mut controller, squat_set(6, 12));
    let epoch = request_epoch(&effects);

    controller.complete_analysis(
        epoch,
        "stub",
        Err(ScorerError::Unavailable("connection refused".to_owned())),
    );

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Complete);
    assert!(snapshot.error.is_none());
    let result = snapshot.result.unwrap();
    assert_eq!(result.source, ScoreSource::LocalEstimate);
    assert_eq!(result.frames_analyzed, 1);
    assert_eq!(result.reps_counted, 5);
}

#[test]
fn test_passive_estimates_every_tenth_sample_after_minimum() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    let mut passive_at = Vec::new();
    for (index, sample) in still_samples(55, 0).into_iter().enumerate() {
        for effect in controller.on_pose_sample(sample) {
            if let SessionEffect::PassiveEstimate { epoch, sample } = effect {
                assert_eq!(epoch, controller.epoch());
                assert_eq!(sample.timestamp_ms(), index as u64 * 100);
                passive_at.push(index + 1);
            }
        }
    }
    assert_eq!(passive_at, vec![30, 40, 50]);
}

#[test]
fn test_passive_estimates_can_be_disabled() {
    let config = SessionConfig {
        passive_analysis_interval: 0,
        ..immediate_config()
    };
    let mut controller =
        SessionController::with_selection(config, ExerciseKind::Squat, SessionMode::Running);
    controller.start_analysis();
    let effects = feed(&mut controller, still_samples(60, 0));
    assert!(effects.is_empty());
}

#[test]
fn test_live_estimate_recorded_for_current_epoch_only() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Running);
    let estimate = remote_result(70, 0, 1);
    assert!(controller.record_live_estimate(controller.epoch(), estimate.clone()));
    assert_eq!(controller.snapshot().live_estimate, Some(estimate.clone()));
    assert!(!controller.record_live_estimate(controller.epoch() - 1, estimate));
}

#[test]
fn test_changing_exercise_resets_session() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, still_samples(20, 0));
    let epoch = controller.epoch();
    let session_id = controller.session_id();

    assert!(controller.set_exercise_kind(ExerciseKind::Squat).is_empty());
    assert_eq!(controller.frames_collected(), 20);

    controller.set_exercise_kind(ExerciseKind::Deadlift);
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(controller.exercise(), ExerciseKind::Deadlift);
    assert_eq!(controller.frames_collected(), 0);
    assert!(controller.epoch() > epoch);
    assert_ne!(controller.session_id(), session_id);
}

#[test]
fn test_changing_mode_resets_session() {
    let mut controller = collecting(ExerciseKind::Squat, SessionMode::Gym);
    feed(&mut controller, still_samples(20, 0));
    controller.set_mode(SessionMode::Running);
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(controller.mode(), SessionMode::Running);
    assert_eq!(controller.frames_collected(), 0);
}

#[test]
fn test_restart_from_complete_counts_down_again() {
    let mut controller = SessionController::with_selection(
        SessionConfig::default(),
        ExerciseKind::Plank,
        SessionMode::Gym,
    );
    controller.start_analysis();
    for _ in 0..5 {
        controller.countdown_tick();
    }
    feed(&mut controller, still_samples(30, 0));
    let epoch = request_epoch(&controller.capture_and_analyze(Vec::new()).unwrap());
    controller.complete_analysis(epoch, "stub", Ok(remote_result(90, 0, 30)));
    assert_eq!(controller.phase(), SessionPhase::Complete);

    let effects = controller.start_analysis();
    assert!(matches!(
        effects.as_slice(),
        [SessionEffect::CountdownStarted { seconds: 5 }]
    ));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Countdown);
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.frames_collected, 0);
}

#[test]
fn test_restart_during_countdown_cancels_then_restarts() {
    let mut controller = SessionController::default();
    controller.start_analysis();
    controller.countdown_tick();
    let effects = controller.start_analysis();
    assert!(matches!(
        effects.as_slice(),
        [
            SessionEffect::CountdownCancelled,
            SessionEffect::CountdownStarted { seconds: 5 }
        ]
    ));
    assert_eq!(controller.snapshot().countdown_seconds_remaining, 5);
}
