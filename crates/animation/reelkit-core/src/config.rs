//! Video timing configuration shared by descriptors and compositions.

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::Result;

/// Frame rate and extent of a composition.
///
/// `width`/`height` are carried for hosts that size their render surface from
/// the same document; nothing in the resolver reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoConfig {
    pub fps: f64,
    pub duration_in_frames: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            duration_in_frames: 150,
            width: 1920,
            height: 1080,
        }
    }
}

impl VideoConfig {
    pub fn new(fps: f64, duration_in_frames: u32) -> Self {
        Self {
            fps,
            duration_in_frames,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_fps(self.fps)?;
        if self.duration_in_frames == 0 {
            return Err(ResolveError::InvalidConfig {
                reason: "durationInFrames must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whole frames covering `seconds` at this frame rate.
    pub fn seconds_to_frames(&self, seconds: f64) -> f64 {
        (seconds * self.fps).round()
    }

    pub fn duration_in_seconds(&self) -> f64 {
        self.duration_in_frames as f64 / self.fps
    }
}

pub(crate) fn validate_fps(fps: f64) -> Result<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(ResolveError::InvalidFps { fps })
    }
}
