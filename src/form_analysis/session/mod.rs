// ABOUTME: Form-analysis session lifecycle: state machine, actor, snapshots, and errors
// ABOUTME: The controller is synchronous; the actor drives it on a tokio task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Tokio event loop and client handle
pub mod actor;
/// Synchronous state machine
pub mod controller;
/// Session error taxonomy
pub mod error;
/// Lifecycle phases
pub mod phase;
/// Observable state
pub mod snapshot;

pub use actor::{SessionActor, SessionHandle};
pub use controller::{AnalysisTrigger, SessionController, SessionEffect};
pub use error::{DiagnosticContext, SessionError};
pub use phase::SessionPhase;
pub use snapshot::SessionSnapshot;
