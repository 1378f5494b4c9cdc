//! ReelKit Core (engine-agnostic)
//!
//! Frame-driven animation value resolution. Given the current frame and a
//! declarative descriptor, produce the scalar that drives a visual property
//! (opacity, scale, translation):
//!
//! - [`interpolate`]: piecewise-linear keyframes with per-side extrapolation
//!   and optional easing.
//! - [`spring`] / [`spring_with`]: closed-form damped oscillator from 0 to 1.
//! - [`Sequence`]: rebases global frames onto a scene's local timeline.
//! - [`Composition`] / [`bake_composition`]: flat lists of animated layer
//!   properties, evaluated per frame or baked ahead of time.
//!
//! Every function is a pure function of its arguments; nothing is cached
//! between frames.

pub mod baking;
pub mod composition;
pub mod config;
pub mod descriptor;
pub mod easing;
pub mod error;
pub mod interp;
pub mod sequence;
pub mod spring;

// Re-exports for consumers (adapters)
pub use baking::{bake_composition, export_baked_json, BakedComposition, BakedTrack, BakingConfig};
pub use composition::{track_key, AnimatedProperty, Composition, FrameValues, Layer, ResolvedValue};
pub use config::VideoConfig;
pub use descriptor::{AnimationDescriptor, InterpolateDescriptor, SpringDescriptor};
pub use easing::Easing;
pub use error::ResolveError;
pub use interp::{interpolate, validate_ranges, Extrapolate, InterpolateOptions};
pub use sequence::Sequence;
pub use spring::{
    measure_spring, spring, spring_state, spring_with, SpringConfig, SpringOptions, SpringState,
    DEFAULT_REST_THRESHOLD, MAX_MEASURED_FRAMES,
};

/// Result type for resolver operations.
pub type Result<T> = core::result::Result<T, ResolveError>;
