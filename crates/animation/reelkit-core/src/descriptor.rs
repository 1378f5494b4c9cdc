//! Declarative animation descriptors.
//!
//! A descriptor is the serializable form of one `interpolate(..)` or
//! `spring(..)` call. JSON shape:
//!
//! ```json
//! { "type": "interpolate", "inputRange": [0, 30], "outputRange": [0, 1], "extrapolateRight": "clamp" }
//! { "type": "spring", "startFrame": 20, "config": { "damping": 15, "stiffness": 120 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::VideoConfig;
use crate::interp::{interpolate, validate_ranges, InterpolateOptions};
use crate::spring::{spring_with, SpringOptions};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolateDescriptor {
    pub input_range: Vec<f64>,
    pub output_range: Vec<f64>,
    #[serde(flatten)]
    pub options: InterpolateOptions,
    /// Frame subtracted from the input before interpolating.
    #[serde(default)]
    pub start_frame: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringDescriptor {
    #[serde(flatten)]
    pub options: SpringOptions,
    /// Frame at which the spring is released.
    #[serde(default)]
    pub start_frame: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationDescriptor {
    Interpolate(InterpolateDescriptor),
    Spring(SpringDescriptor),
}

impl AnimationDescriptor {
    pub fn interpolate(
        input_range: impl Into<Vec<f64>>,
        output_range: impl Into<Vec<f64>>,
        options: InterpolateOptions,
    ) -> Self {
        AnimationDescriptor::Interpolate(InterpolateDescriptor {
            input_range: input_range.into(),
            output_range: output_range.into(),
            options,
            start_frame: 0.0,
        })
    }

    pub fn spring(options: SpringOptions) -> Self {
        AnimationDescriptor::Spring(SpringDescriptor {
            options,
            start_frame: 0.0,
        })
    }

    /// Delay the descriptor's logical start to `frame`.
    pub fn starting_at(mut self, frame: f64) -> Self {
        match &mut self {
            AnimationDescriptor::Interpolate(d) => d.start_frame = frame,
            AnimationDescriptor::Spring(d) => d.start_frame = frame,
        }
        self
    }

    pub fn start_frame(&self) -> f64 {
        match self {
            AnimationDescriptor::Interpolate(d) => d.start_frame,
            AnimationDescriptor::Spring(d) => d.start_frame,
        }
    }

    /// Check the parts that can be checked without a frame.
    pub fn validate(&self) -> Result<()> {
        match self {
            AnimationDescriptor::Interpolate(d) => validate_ranges(&d.input_range, &d.output_range),
            AnimationDescriptor::Spring(_) => Ok(()),
        }
    }

    /// Value of the animation at `frame`.
    pub fn resolve(&self, frame: f64, video: &VideoConfig) -> Result<f64> {
        let local = frame - self.start_frame();
        match self {
            AnimationDescriptor::Interpolate(d) => {
                interpolate(local, &d.input_range, &d.output_range, &d.options)
            }
            AnimationDescriptor::Spring(d) => spring_with(local, video.fps, &d.options),
        }
    }
}
