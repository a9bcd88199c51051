// ABOUTME: Unified error types re-exported from the pierre-core foundation crate
// ABOUTME: Callers use AppError and AppResult without depending on pierre-core directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::errors::*;
