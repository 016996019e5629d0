use crate::constants::*;
use crate::landmarks::FaceLandmarks;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GestureError {
    #[error("landmark {index} missing (face has {len} points)")]
    MissingLandmark { index: usize, len: usize },
    #[error("mouth width {0:.6} too small to normalize")]
    DegenerateWidth(f32),
}

/// Mouth opening measured on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouthSample {
    pub height: f32,
    pub width: f32,
    pub ratio: f32,
}

impl MouthSample {
    /// Dividing by the corner distance makes the ratio independent of how far
    /// the face is from the camera.
    pub fn measure(face: &FaceLandmarks) -> Result<Self, GestureError> {
        let point = |index: usize| {
            face.get(index).ok_or(GestureError::MissingLandmark {
                index,
                len: face.len(),
            })
        };
        let upper = point(UPPER_LIP_INDEX)?;
        let lower = point(LOWER_LIP_INDEX)?;
        let left = point(MOUTH_LEFT_INDEX)?;
        let right = point(MOUTH_RIGHT_INDEX)?;

        let height = upper.distance(lower);
        let width = left.distance(right);
        if !width.is_finite() || width < MIN_MOUTH_WIDTH {
            return Err(GestureError::DegenerateWidth(width));
        }
        Ok(Self {
            height,
            width,
            ratio: height / width,
        })
    }

    #[inline]
    pub fn is_open(&self, threshold: f32) -> bool {
        self.ratio > threshold
    }
}

/// What one tracked frame says about the user.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameVerdict {
    pub face_present: bool,
    pub ratio: Option<f32>,
    pub mouth_open: bool,
}

/// Stateless per-frame evaluator; every frame is judged on its own.
#[derive(Clone, Debug)]
pub struct GestureDetector {
    threshold: f32,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(MOUTH_OPEN_THRESHOLD)
    }
}

impl GestureDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, face: Option<&FaceLandmarks>) -> FrameVerdict {
        let Some(face) = face else {
            return FrameVerdict::default();
        };
        match MouthSample::measure(face) {
            Ok(sample) => FrameVerdict {
                face_present: true,
                ratio: Some(sample.ratio),
                mouth_open: sample.is_open(self.threshold),
            },
            Err(e) => {
                log::debug!("[gesture] face without usable mouth: {}", e);
                FrameVerdict {
                    face_present: true,
                    ratio: None,
                    mouth_open: false,
                }
            }
        }
    }
}
