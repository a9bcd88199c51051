// ABOUTME: Loader for recorded pose-sample streams stored as JSON Lines
// ABOUTME: One PoseSample object per line; blank lines are skipped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::PoseSample;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// Read every sample from a JSON Lines recording
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid sample
pub async fn load_pose_samples(path: impl AsRef<Path>) -> AppResult<Vec<PoseSample>> {
    let path = path.as_ref();
    let file = File::open(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot open recording {}: {e}", path.display()))
    })?;
    let samples = parse_pose_samples(BufReader::new(file)).await?;
    debug!(path = %path.display(), samples = samples.len(), "Loaded pose recording");
    Ok(samples)
}

/// Parse samples from any buffered async reader
///
/// # Errors
///
/// Returns an error naming the 1-based line that failed to read or parse
pub async fn parse_pose_samples<R>(reader: R) -> AppResult<Vec<PoseSample>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut samples = Vec::new();
    let mut line_number = 0_usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AppError::invalid_input(format!("Read failed after line {line_number}: {e}")))?
    {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let sample = serde_json::from_str::<PoseSample>(trimmed).map_err(|e| {
            AppError::invalid_input(format!("Invalid pose sample on line {line_number}: {e}"))
        })?;
        samples.push(sample);
    }

    Ok(samples)
}
