// ABOUTME: Skeletal pose models produced by the external pose-inference collaborator
// ABOUTME: Defines Landmark joint identifiers, normalized Point3 coordinates, and PoseSample
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Named skeletal joint identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    /// Nose tip
    Nose,
    /// Left shoulder joint
    LeftShoulder,
    /// Right shoulder joint
    RightShoulder,
    /// Left elbow joint
    LeftElbow,
    /// Right elbow joint
    RightElbow,
    /// Left wrist joint
    LeftWrist,
    /// Right wrist joint
    RightWrist,
    /// Left hip joint
    LeftHip,
    /// Right hip joint
    RightHip,
    /// Left knee joint
    LeftKnee,
    /// Right knee joint
    RightKnee,
    /// Left ankle joint
    LeftAnkle,
    /// Right ankle joint
    RightAnkle,
}

impl Landmark {
    /// Every landmark, in skeleton order
    pub const ALL: [Self; 13] = [
        Self::Nose,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Snake-case identifier, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Parse a snake-case identifier; `None` for joints this model does not track
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|landmark| landmark.as_str() == name)
    }

    /// The same joint on the opposite side of the body
    #[must_use]
    pub const fn mirror(&self) -> Self {
        match self {
            Self::Nose => Self::Nose,
            Self::LeftShoulder => Self::RightShoulder,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::RightElbow => Self::LeftElbow,
            Self::LeftWrist => Self::RightWrist,
            Self::RightWrist => Self::LeftWrist,
            Self::LeftHip => Self::RightHip,
            Self::RightHip => Self::LeftHip,
            Self::LeftKnee => Self::RightKnee,
            Self::RightKnee => Self::LeftKnee,
            Self::LeftAnkle => Self::RightAnkle,
            Self::RightAnkle => Self::LeftAnkle,
        }
    }
}

impl Display for Landmark {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized 3D point: `x`, `y` in `[0, 1]` image space (y grows downward), `z` relative depth
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// Horizontal position, 0 = left edge
    pub x: f32,
    /// Vertical position, 0 = top edge
    pub y: f32,
    /// Relative depth, negative is closer to the camera
    #[serde(default)]
    pub z: f32,
}

impl Point3 {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One timestamped skeletal pose, immutable once produced
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseSample {
    timestamp_ms: u64,
    #[serde(default, deserialize_with = "tracked_landmarks")]
    landmarks: BTreeMap<Landmark, Point3>,
}

/// Pose models emit more joints than are tracked here; unknown keys are dropped
fn tracked_landmarks<'de, D>(deserializer: D) -> Result<BTreeMap<Landmark, Point3>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Point3>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, point)| Landmark::from_name(&name).map(|landmark| (landmark, point)))
        .collect())
}

impl PoseSample {
    /// Create an empty sample (no joints detected)
    #[must_use]
    pub const fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            landmarks: BTreeMap::new(),
        }
    }

    /// Create a sample from a set of detected joints
    pub fn from_landmarks(
        timestamp_ms: u64,
        landmarks: impl IntoIterator<Item = (Landmark, Point3)>,
    ) -> Self {
        Self {
            timestamp_ms,
            landmarks: landmarks.into_iter().collect(),
        }
    }

    /// Builder-style helper adding one detected joint
    #[must_use]
    pub fn with_landmark(mut self, landmark: Landmark, point: Point3) -> Self {
        self.landmarks.insert(landmark, point);
        self
    }

    /// Capture time in milliseconds on the producer's monotonic clock
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Position of a joint if it was detected
    #[must_use]
    pub fn landmark(&self, landmark: Landmark) -> Option<Point3> {
        self.landmarks.get(&landmark).copied()
    }

    /// Whether a joint was detected
    #[must_use]
    pub fn contains(&self, landmark: Landmark) -> bool {
        self.landmarks.contains_key(&landmark)
    }

    /// Whether either side of a mirrored joint pair was detected
    #[must_use]
    pub fn contains_either(&self, left: Landmark, right: Landmark) -> bool {
        self.contains(left) || self.contains(right)
    }

    /// Iterate over detected joints in skeleton order
    pub fn landmarks(&self) -> impl Iterator<Item = (Landmark, Point3)> + '_ {
        self.landmarks.iter().map(|(landmark, point)| (*landmark, *point))
    }

    /// Number of detected joints
    #[must_use]
    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }

    /// True when the pose model detected nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Mean vertical position of two joints; `None` unless both were detected
    #[must_use]
    pub fn average_y(&self, first: Landmark, second: Landmark) -> Option<f32> {
        let a = self.landmark(first)?;
        let b = self.landmark(second)?;
        Some((a.y + b.y) / 2.0)
    }

    /// Midpoint of two joints; `None` unless both were detected
    #[must_use]
    pub fn midpoint(&self, first: Landmark, second: Landmark) -> Option<Point3> {
        let a = self.landmark(first)?;
        let b = self.landmark(second)?;
        Some(Point3::new(
            (a.x + b.x) / 2.0,
            (a.y + b.y) / 2.0,
            (a.z + b.z) / 2.0,
        ))
    }
}

