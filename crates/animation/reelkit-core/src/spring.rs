//! Spring-physics animation.
//!
//! A damped harmonic oscillator released at frame 0 from rest at 0 and pulled
//! toward 1. Values are evaluated in closed form at `t = frame / fps`, so any
//! frame can be resolved independently of the ones before it.
//!
//! - `omega0 = sqrt(stiffness / mass)`
//! - `zeta = damping / (2 * sqrt(stiffness * mass))`
//!
//! Underdamped springs (`zeta < 1`) overshoot 1 and oscillate before settling;
//! critically damped and overdamped springs approach 1 monotonically.

use serde::{Deserialize, Serialize};

use crate::config::validate_fps;
use crate::error::ResolveError;
use crate::interp::functions::lerp;
use crate::Result;

/// Default rest threshold used when measuring a spring's natural duration.
pub const DEFAULT_REST_THRESHOLD: f64 = 0.005;

/// Upper bound on frames scanned by [`measure_spring`].
pub const MAX_MEASURED_FRAMES: u32 = 100_000;

/// Consecutive in-threshold frames required before a spring counts as settled.
const SETTLE_FRAMES: u32 = 20;

const FALLBACK_FPS: f64 = 30.0;
const MIN_MASS: f64 = 1.0e-4;
const MIN_STIFFNESS: f64 = 1.0e-4;
const CRITICAL_BAND: f64 = 1.0e-6;

/// Physical parameters of a spring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpringConfig {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
    /// Cap the curve at its target instead of overshooting.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            stiffness: 100.0,
            mass: 1.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    /// Undamped angular frequency (rad/s) after parameter sanitizing.
    pub fn angular_frequency(&self) -> f64 {
        self.physics().omega0
    }

    /// Damping ratio after parameter sanitizing.
    pub fn damping_ratio(&self) -> f64 {
        self.physics().zeta
    }

    fn physics(&self) -> Physics {
        let mass = if self.mass.is_finite() && self.mass > 0.0 {
            self.mass.max(MIN_MASS)
        } else {
            log::warn!("spring mass {} is not positive, using 1", self.mass);
            1.0
        };
        let stiffness = if self.stiffness.is_finite() && self.stiffness > 0.0 {
            self.stiffness.max(MIN_STIFFNESS)
        } else {
            log::warn!("spring stiffness {} is not positive, clamping", self.stiffness);
            MIN_STIFFNESS
        };
        let damping = if self.damping.is_finite() {
            self.damping.max(0.0)
        } else {
            log::warn!("spring damping {} is not finite, using 0", self.damping);
            0.0
        };

        Physics {
            omega0: (stiffness / mass).sqrt(),
            zeta: damping / (2.0 * (stiffness * mass).sqrt()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Physics {
    omega0: f64,
    zeta: f64,
}

impl Physics {
    /// Displacement from the target and its velocity after `t` seconds.
    fn evolve(&self, d0: f64, v0: f64, t: f64) -> (f64, f64) {
        let Physics { omega0, zeta } = *self;

        if zeta < 1.0 - CRITICAL_BAND {
            let decay = zeta * omega0;
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let b = (v0 + decay * d0) / omega_d;
            let (sin, cos) = (omega_d * t).sin_cos();
            let envelope = (-decay * t).exp();
            let d = envelope * (d0 * cos + b * sin);
            let v = envelope * (omega_d * (b * cos - d0 * sin)) - decay * d;
            (d, v)
        } else if zeta <= 1.0 + CRITICAL_BAND {
            let b = v0 + omega0 * d0;
            let envelope = (-omega0 * t).exp();
            let d = envelope * (d0 + b * t);
            let v = envelope * b - omega0 * d;
            (d, v)
        } else {
            // r1 * r2 == omega0^2; derive the slow root from the fast one to
            // avoid cancellation at large damping ratios.
            let r2 = -omega0 * (zeta + (zeta - 1.0).sqrt() * (zeta + 1.0).sqrt());
            if !r2.is_finite() {
                // Fast mode decays instantly and the slow one never moves.
                return (d0, 0.0);
            }
            let r1 = omega0 * omega0 / r2;
            let c1 = (v0 - r2 * d0) / (r1 - r2);
            let c2 = d0 - c1;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }
}

/// Normalized position (0 at rest, 1 at target) and velocity (units per second).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpringState {
    pub position: f64,
    pub velocity: f64,
}

impl SpringState {
    const SETTLED: SpringState = SpringState {
        position: 1.0,
        velocity: 0.0,
    };
}

fn sanitize_fps(fps: f64) -> f64 {
    if validate_fps(fps).is_ok() {
        fps
    } else {
        log::warn!("spring fps {fps} is not usable, falling back to {FALLBACK_FPS}");
        FALLBACK_FPS
    }
}

fn raw_state(frame: f64, fps: f64, config: &SpringConfig) -> SpringState {
    if frame.is_nan() || frame <= 0.0 {
        return SpringState::default();
    }
    if frame.is_infinite() {
        return SpringState::SETTLED;
    }
    let t = frame / sanitize_fps(fps);
    let (d, v) = config.physics().evolve(-1.0, 0.0, t);
    SpringState {
        position: 1.0 + d,
        velocity: v,
    }
}

/// Position and velocity of the normalized spring at `frame`.
///
/// Negative frames are "not started" and report the rest state.
pub fn spring_state(frame: f64, fps: f64, config: &SpringConfig) -> SpringState {
    let state = raw_state(frame, fps, config);
    if config.overshoot_clamping && state.position > 1.0 {
        SpringState::SETTLED
    } else {
        state
    }
}

/// Spring value at `frame`, moving from 0 toward 1.
///
/// Never fails: negative frames return 0 and unusable parameters are replaced
/// with the nearest sensible value (logged at `warn`).
///
/// ```
/// use reelkit_core::{spring, SpringConfig};
///
/// let cfg = SpringConfig::default().damping(12.0);
/// assert_eq!(spring(-5.0, 30.0, &cfg), 0.0);
/// assert!((spring(300.0, 30.0, &cfg) - 1.0).abs() < 1e-6);
/// ```
pub fn spring(frame: f64, fps: f64, config: &SpringConfig) -> f64 {
    spring_state(frame, fps, config).position
}

/// Everything a spring animation can be configured with besides frame and fps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpringOptions {
    pub config: SpringConfig,
    pub from: f64,
    pub to: f64,
    /// Frames to wait before the spring is released.
    pub delay: f64,
    /// Play the curve backwards, from `to` toward `from`.
    pub reverse: bool,
    /// Stretch or squeeze the curve so it settles after this many frames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<f64>,
    /// Threshold used to measure the natural duration; defaults to
    /// [`DEFAULT_REST_THRESHOLD`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_rest_threshold: Option<f64>,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            config: SpringConfig::default(),
            from: 0.0,
            to: 1.0,
            delay: 0.0,
            reverse: false,
            duration_in_frames: None,
            duration_rest_threshold: None,
        }
    }
}

impl SpringOptions {
    pub fn with_config(config: SpringConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn delay(mut self, frames: f64) -> Self {
        self.delay = frames;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn duration_in_frames(mut self, frames: f64) -> Self {
        self.duration_in_frames = Some(frames);
        self
    }
}

/// Spring value at `frame` with range mapping, delay, reversal and duration
/// stretching applied.
///
/// Fails only when a natural duration has to be measured (for `reverse` or
/// `duration_in_frames`) and cannot be, or when the options are malformed.
pub fn spring_with(frame: f64, fps: f64, options: &SpringOptions) -> Result<f64> {
    validate_fps(fps)?;
    let config = &options.config;

    if let Some(duration) = options.duration_in_frames {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ResolveError::InvalidConfig {
                reason: format!("durationInFrames must be positive, got {duration}"),
            });
        }
    }

    let natural = if options.reverse || options.duration_in_frames.is_some() {
        let threshold = options
            .duration_rest_threshold
            .unwrap_or(DEFAULT_REST_THRESHOLD);
        Some(measure_spring(fps, config, threshold)?.max(1) as f64)
    } else {
        None
    };

    let mut local = match (options.reverse, options.duration_in_frames.or(natural)) {
        (true, Some(span)) => span - frame + options.delay,
        _ => frame - options.delay,
    };

    if let (Some(duration), Some(natural)) = (options.duration_in_frames, natural) {
        if local > duration {
            return Ok(options.to);
        }
        local /= duration / natural;
    }

    let progress = spring(local, fps, config);
    if options.from == 0.0 && options.to == 1.0 {
        Ok(progress)
    } else {
        Ok(lerp(options.from, options.to, progress))
    }
}

/// Frames until the spring stays within `threshold` of its target.
///
/// The spring counts as settled once it has remained inside the threshold for
/// 20 consecutive frames; the returned frame is the first one of that run.
pub fn measure_spring(fps: f64, config: &SpringConfig, threshold: f64) -> Result<u32> {
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(ResolveError::InvalidThreshold { threshold });
    }
    validate_fps(fps)?;

    let distance = |frame: u32| (1.0 - raw_state(frame as f64, fps, config).position).abs();
    let never_settles = || ResolveError::SpringNeverSettles {
        max_frames: MAX_MEASURED_FRAMES,
        threshold,
    };

    let mut frame = 0u32;
    while distance(frame) >= threshold {
        frame += 1;
        if frame > MAX_MEASURED_FRAMES {
            return Err(never_settles());
        }
    }

    let mut settled_at = frame;
    let mut calm = 0u32;
    while calm < SETTLE_FRAMES {
        frame += 1;
        if frame > MAX_MEASURED_FRAMES {
            return Err(never_settles());
        }
        if distance(frame) >= threshold {
            calm = 0;
            settled_at = frame + 1;
        } else {
            calm += 1;
        }
    }

    log::trace!("spring {config:?} settles at frame {settled_at} ({fps} fps)");
    Ok(settled_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn not_started_before_frame_zero() {
        let cfg = SpringConfig::default().damping(12.0);
        for frame in [-5.0, -1.0, -0.5, 0.0] {
            assert_eq!(spring(frame, 30.0, &cfg), 0.0);
        }
        assert_eq!(spring(f64::NAN, 30.0, &cfg), 0.0);
    }

    #[test]
    fn underdamped_overshoots_then_settles() {
        let cfg = SpringConfig::default();
        assert!(cfg.damping_ratio() < 1.0);
        let peak = (0..120)
            .map(|f| spring(f as f64, 30.0, &cfg))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "peak {peak} should overshoot");
        assert_abs_diff_eq!(spring(600.0, 30.0, &cfg), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn overdamped_is_monotonic() {
        for damping in [20.0, 40.0, 200.0] {
            let cfg = SpringConfig::default().damping(damping);
            assert!(cfg.damping_ratio() >= 1.0);
            let mut prev = 0.0;
            for f in 0..400 {
                let v = spring(f as f64, 30.0, &cfg);
                assert!(v >= prev - 1e-12, "damping {damping}: {v} < {prev} at {f}");
                assert!(v <= 1.0 + 1e-12);
                prev = v;
            }
        }
    }

    #[test]
    fn critically_damped_matches_neighbours() {
        // zeta == 1 exactly; the closed form should sit between its neighbours.
        let crit = SpringConfig::default().damping(20.0);
        let under = SpringConfig::default().damping(19.99);
        let over = SpringConfig::default().damping(20.01);
        let f = 10.0;
        let c = spring(f, 30.0, &crit);
        assert_abs_diff_eq!(c, spring(f, 30.0, &under), epsilon = 1e-3);
        assert_abs_diff_eq!(c, spring(f, 30.0, &over), epsilon = 1e-3);
    }

    #[test]
    fn velocity_starts_at_rest_and_decays() {
        let cfg = SpringConfig::default();
        assert_eq!(spring_state(0.0, 30.0, &cfg).velocity, 0.0);
        assert!(spring_state(2.0, 30.0, &cfg).velocity > 0.0);
        assert_abs_diff_eq!(spring_state(900.0, 30.0, &cfg).velocity, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn velocity_matches_finite_difference() {
        let cfg = SpringConfig::default().damping(7.0).mass(0.5);
        let fps = 60.0;
        let h = 1e-3;
        let f = 12.0;
        let numeric = (spring(f + h, fps, &cfg) - spring(f - h, fps, &cfg)) / (2.0 * h / fps);
        assert_abs_diff_eq!(spring_state(f, fps, &cfg).velocity, numeric, epsilon = 1e-4);
    }

    #[test]
    fn overshoot_clamping_caps_at_target() {
        let cfg = SpringConfig::default().overshoot_clamping(true);
        for f in 0..120 {
            assert!(spring(f as f64, 30.0, &cfg) <= 1.0);
        }
    }

    #[test]
    fn bad_parameters_stay_finite() {
        let cfgs = [
            SpringConfig::default().mass(0.0),
            SpringConfig::default().mass(-3.0),
            SpringConfig::default().stiffness(0.0),
            SpringConfig::default().damping(f64::NAN),
            SpringConfig::default().damping(-4.0),
        ];
        for cfg in cfgs {
            for f in [0.0, 1.0, 30.0, 1000.0] {
                assert!(spring(f, 30.0, &cfg).is_finite(), "{cfg:?} at {f}");
            }
        }
        assert!(spring(10.0, 0.0, &SpringConfig::default()).is_finite());
    }

    #[test]
    fn extreme_damping_stays_finite() {
        for damping in [1.0e160, 1.0e200, f64::MAX] {
            for cfg in [
                SpringConfig::default().damping(damping),
                SpringConfig::default().damping(damping).mass(1.0e-300),
            ] {
                for f in [0.0, 1.0, 10.0, 1000.0] {
                    let state = spring_state(f, 30.0, &cfg);
                    assert!(state.position.is_finite(), "{cfg:?} at {f}");
                    assert!(state.velocity.is_finite(), "{cfg:?} at {f}");
                    assert!((0.0..=1.0).contains(&state.position), "{cfg:?} at {f}");
                }
            }
        }
        // Heavily overdamped springs barely leave the start.
        assert!(spring(10.0, 30.0, &SpringConfig::default().damping(1.0e200)) < 1e-6);
    }

    #[test]
    fn delay_shifts_the_curve() {
        let opts = SpringOptions::default().delay(20.0);
        let base = SpringConfig::default();
        assert_eq!(spring_with(10.0, 30.0, &opts).unwrap(), 0.0);
        assert_eq!(
            spring_with(35.0, 30.0, &opts).unwrap(),
            spring(15.0, 30.0, &base)
        );
    }

    #[test]
    fn range_is_mapped() {
        let opts = SpringOptions::default().range(100.0, 200.0);
        assert_eq!(spring_with(-1.0, 30.0, &opts).unwrap(), 100.0);
        assert_abs_diff_eq!(spring_with(900.0, 30.0, &opts).unwrap(), 200.0, epsilon = 1e-6);
    }

    #[test]
    fn duration_stretch_settles_on_time() {
        let opts = SpringOptions::with_config(SpringConfig::default().damping(200.0))
            .duration_in_frames(40.0);
        let end = spring_with(40.0, 30.0, &opts).unwrap();
        assert_abs_diff_eq!(end, 1.0, epsilon = DEFAULT_REST_THRESHOLD);
        assert_eq!(spring_with(41.0, 30.0, &opts).unwrap(), 1.0);
        assert!(spring_with(10.0, 30.0, &opts).unwrap() < end);
    }

    #[test]
    fn reverse_runs_from_target_back_to_start() {
        let opts = SpringOptions::default().reverse(true);
        let start = spring_with(0.0, 30.0, &opts).unwrap();
        assert_abs_diff_eq!(start, 1.0, epsilon = 0.01);
        let natural = measure_spring(30.0, &SpringConfig::default(), DEFAULT_REST_THRESHOLD)
            .unwrap() as f64;
        assert_eq!(spring_with(natural, 30.0, &opts).unwrap(), 0.0);
    }

    #[test]
    fn measured_duration_is_within_threshold_from_then_on() {
        let cfg = SpringConfig::default().damping(12.0);
        let settled = measure_spring(30.0, &cfg, DEFAULT_REST_THRESHOLD).unwrap();
        assert!(settled > 0);
        for f in settled..settled + 120 {
            assert!((spring(f as f64, 30.0, &cfg) - 1.0).abs() < DEFAULT_REST_THRESHOLD);
        }
        assert!((spring(settled as f64 - 1.0, 30.0, &cfg) - 1.0).abs() >= DEFAULT_REST_THRESHOLD);
    }

    #[test]
    fn measure_rejects_bad_threshold() {
        let cfg = SpringConfig::default();
        assert!(matches!(
            measure_spring(30.0, &cfg, 0.0),
            Err(ResolveError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            measure_spring(30.0, &cfg, -1.0),
            Err(ResolveError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            measure_spring(0.0, &cfg, 0.01),
            Err(ResolveError::InvalidFps { .. })
        ));
    }

    #[test]
    fn undamped_spring_never_settles() {
        let cfg = SpringConfig::default().damping(0.0);
        assert!(matches!(
            measure_spring(30.0, &cfg, 0.01),
            Err(ResolveError::SpringNeverSettles { .. })
        ));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: SpringOptions =
            serde_json::from_str(r#"{"config":{"damping":15,"stiffness":120},"delay":20}"#)
                .unwrap();
        assert_eq!(opts.config.damping, 15.0);
        assert_eq!(opts.config.stiffness, 120.0);
        assert_eq!(opts.config.mass, 1.0);
        assert_eq!(opts.to, 1.0);
        assert_eq!(opts.delay, 20.0);
        assert!(opts.duration_in_frames.is_none());
    }
}
