// src/landmarks.rs - Hand observation types shared across the pipeline
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// MediaPipe hand landmark indices.
/// See: https://google.github.io/mediapipe/solutions/hands.html
#[allow(dead_code)]
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Number of landmarks the pose oracle reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// One anatomical point of a tracked hand, in normalized image
/// coordinates (x, y in 0.0..=1.0, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// All 21 landmarks of a single hand in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandObservation {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build an observation from per-index coordinates.
    pub fn from_fn(mut f: impl FnMut(usize) -> Landmark) -> Self {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = f(i);
        }
        Self { landmarks }
    }

    pub fn landmark(&self, idx: usize) -> Landmark {
        self.landmarks[idx]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }
}

/// One video frame's worth of input to the pipeline: whatever hands the
/// pose oracle reported (possibly none) and the capture timestamp.
#[derive(Debug, Clone)]
pub struct Frame {
    pub hands: Vec<HandObservation>,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(hands: Vec<HandObservation>, timestamp: Instant) -> Self {
        Self { hands, timestamp }
    }

    /// Frame with no detected hands.
    pub fn empty(timestamp: Instant) -> Self {
        Self {
            hands: Vec::new(),
            timestamp,
        }
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }
}
