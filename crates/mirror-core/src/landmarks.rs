//! Narrow view of the face tracker's per-frame output.
//!
//! The tracker hands back an untyped list of points per face. Everything the
//! mirror needs is a dense, index-addressable list of 2D positions in
//! normalized image space (`0..1` on both axes, origin top-left, unmirrored),
//! so that is all we keep. Depth is dropped at the boundary.

use crate::constants::*;
use glam::Vec2;

/// Landmark positions of a single tracked face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Vec2>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Axis-aligned bounds of the four mouth landmarks, if all are present.
    pub fn mouth_bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for index in MOUTH_LANDMARKS {
            let p = self.get(index)?;
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }
}

/// Options handed to the tracker once, before the first `start`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerOptions {
    pub max_faces: u32,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            max_faces: TRACKER_MAX_FACES,
            refine_landmarks: TRACKER_REFINE_LANDMARKS,
            min_detection_confidence: TRACKER_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: TRACKER_MIN_TRACKING_CONFIDENCE,
        }
    }
}
