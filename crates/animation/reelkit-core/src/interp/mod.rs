//! Keyframe interpolation.
//!
//! Maps an input (usually the current frame) through a piecewise-linear
//! function defined by `input_range -> output_range` control points:
//!
//! ```
//! use reelkit_core::{interpolate, Extrapolate, InterpolateOptions};
//!
//! // Fade in over 30 frames, then hold.
//! let opts = InterpolateOptions::default().extrapolate_right(Extrapolate::Clamp);
//! assert_eq!(interpolate(15.0, &[0.0, 30.0], &[0.0, 1.0], &opts).unwrap(), 0.5);
//! assert_eq!(interpolate(45.0, &[0.0, 30.0], &[0.0, 1.0], &opts).unwrap(), 1.0);
//! ```
//!
//! Ranges are validated on every call; malformed ranges are reported as
//! [`ResolveError`] rather than producing NaN.

pub mod functions;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::ResolveError;
use crate::Result;
use functions::{find_segment, inverse_lerp, lerp, wrap_into};

/// Behavior for inputs outside the control-point range, chosen per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolate {
    /// Hold the boundary output value.
    Clamp,
    /// Continue the outer segment's linear function.
    #[default]
    Extend,
    /// Return the input unchanged.
    Identity,
    /// Fold the input back into the outer segment periodically.
    Wrap,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpolateOptions {
    pub extrapolate_left: Extrapolate,
    pub extrapolate_right: Extrapolate,
    pub easing: Easing,
}

impl InterpolateOptions {
    /// Clamp on both sides.
    pub fn clamped() -> Self {
        Self {
            extrapolate_left: Extrapolate::Clamp,
            extrapolate_right: Extrapolate::Clamp,
            easing: Easing::Linear,
        }
    }

    pub fn extrapolate_left(mut self, policy: Extrapolate) -> Self {
        self.extrapolate_left = policy;
        self
    }

    pub fn extrapolate_right(mut self, policy: Extrapolate) -> Self {
        self.extrapolate_right = policy;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Check that the ranges describe a valid piecewise-linear function.
pub fn validate_ranges(input_range: &[f64], output_range: &[f64]) -> Result<()> {
    if input_range.len() != output_range.len() {
        return Err(ResolveError::RangeLengthMismatch {
            input_len: input_range.len(),
            output_len: output_range.len(),
        });
    }
    if input_range.len() < 2 {
        return Err(ResolveError::RangeTooShort {
            range: "inputRange".to_string(),
            len: input_range.len(),
        });
    }
    check_finite("inputRange", input_range)?;
    check_finite("outputRange", output_range)?;
    for (index, pair) in input_range.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(ResolveError::NonMonotonicInputRange {
                index,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    check_spans("inputRange", input_range)?;
    check_spans("outputRange", output_range)?;
    Ok(())
}

// Finite neighbours can still overflow when subtracted (e.g. -1e308..1e308).
fn check_spans(range: &str, values: &[f64]) -> Result<()> {
    match values.windows(2).position(|w| !(w[1] - w[0]).is_finite()) {
        Some(index) => Err(ResolveError::SpanOverflow {
            range: range.to_string(),
            index,
            prev: values[index],
            next: values[index + 1],
        }),
        None => Ok(()),
    }
}

fn check_finite(range: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ResolveError::NonFiniteRange {
            range: range.to_string(),
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

/// Interpolate `input` through the control points.
pub fn interpolate(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    options: &InterpolateOptions,
) -> Result<f64> {
    validate_ranges(input_range, output_range)?;
    if !input.is_finite() {
        return Err(ResolveError::NonFiniteInput { value: input });
    }

    let i = find_segment(input, input_range);
    Ok(interpolate_segment(
        input,
        [input_range[i], input_range[i + 1]],
        [output_range[i], output_range[i + 1]],
        options,
    ))
}

fn interpolate_segment(
    input: f64,
    [in_min, in_max]: [f64; 2],
    [out_min, out_max]: [f64; 2],
    options: &InterpolateOptions,
) -> f64 {
    let mut x = input;

    if x < in_min {
        match options.extrapolate_left {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_min,
            Extrapolate::Wrap => x = wrap_into(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }

    if x > in_max {
        match options.extrapolate_right {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_max,
            Extrapolate::Wrap => x = wrap_into(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }

    if out_min == out_max {
        return out_min;
    }

    let t = options.easing.apply(inverse_lerp(in_min, in_max, x));
    lerp(out_min, out_max, t)
}
