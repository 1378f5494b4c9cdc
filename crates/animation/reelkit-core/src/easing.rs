//! Easing curves applied to normalized segment progress.
//!
//! Every curve maps `1 -> 1`, and every curve except `Exp` maps `0 -> 0`;
//! `Exp` starts at `2^-10`. Inputs outside `[0, 1]` (from `Extend`
//! extrapolation) are passed through the same formula with three exceptions
//! that would otherwise produce NaN or leave the curve's domain: `Bezier`
//! clamps to `[0, 1]` like CSS timing functions do, `Circle` clamps to
//! `[-1, 1]`, and `Poly` with a fractional exponent holds 0 below the start.
//!
//! The base curves are "in" curves; wrap them in `Out` or `InOut` to mirror
//! them:
//!
//! ```
//! use reelkit_core::Easing;
//!
//! let e = Easing::out(Easing::Cubic);
//! assert!(e.apply(0.5) > 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// An easing curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in`, i.e. `Bezier(0.42, 0, 1, 1)`.
    Ease,
    Quad,
    Cubic,
    /// `t^n`
    Poly { n: f64 },
    Sin,
    Circle,
    Exp,
    /// Spring-like wobble; `bounciness` of 1 oscillates once past the start.
    Elastic {
        #[serde(default = "default_bounciness")]
        bounciness: f64,
    },
    /// Pulls back before moving forward.
    Back {
        #[serde(default = "default_overshoot")]
        overshoot: f64,
    },
    Bounce,
    /// Cubic bezier timing function with control points `(x1, y1)` and `(x2, y2)`.
    Bezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    In { easing: Box<Easing> },
    Out { easing: Box<Easing> },
    InOut { easing: Box<Easing> },
}

fn default_bounciness() -> f64 {
    1.0
}

fn default_overshoot() -> f64 {
    1.70158
}

impl Easing {
    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Easing::Bezier { x1, y1, x2, y2 }
    }

    pub fn ease_in(easing: Easing) -> Self {
        Easing::In {
            easing: Box::new(easing),
        }
    }

    pub fn out(easing: Easing) -> Self {
        Easing::Out {
            easing: Box::new(easing),
        }
    }

    pub fn in_out(easing: Easing) -> Self {
        Easing::InOut {
            easing: Box::new(easing),
        }
    }

    /// Apply the curve to a progress value.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Ease => bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Easing::Quad => t * t,
            Easing::Cubic => t * t * t,
            Easing::Poly { n } if n.fract() != 0.0 => t.max(0.0).powf(*n),
            Easing::Poly { n } => t.powf(*n),
            Easing::Sin => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Easing::Circle => {
                let t = t.clamp(-1.0, 1.0);
                1.0 - (1.0 - t * t).sqrt()
            }
            Easing::Exp => 2f64.powf(10.0 * (t - 1.0)),
            Easing::Elastic { bounciness } => {
                let p = bounciness * std::f64::consts::PI;
                1.0 - (t * std::f64::consts::FRAC_PI_2).cos().powi(3) * (t * p).cos()
            }
            Easing::Back { overshoot } => t * t * ((overshoot + 1.0) * t - overshoot),
            Easing::Bounce => bounce(t),
            Easing::Bezier { x1, y1, x2, y2 } => bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::In { easing } => easing.apply(t),
            Easing::Out { easing } => 1.0 - easing.apply(1.0 - t),
            Easing::InOut { easing } => {
                if t < 0.5 {
                    easing.apply(t * 2.0) / 2.0
                } else {
                    1.0 - easing.apply((1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t2 = t - 1.5 / D;
        N * t2 * t2 + 0.75
    } else if t < 2.5 / D {
        let t2 = t - 2.25 / D;
        N * t2 * t2 + 0.9375
    } else {
        let t2 = t - 2.625 / D;
        N * t2 * t2 + 0.984375
    }
}

#[inline]
fn cubic_bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

#[inline]
fn cubic_bezier_slope(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Solve x(s) = t for the curve parameter, then evaluate y(s).
///
/// Newton-Raphson first; falls back to bisection when the slope flattens.
fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    if x1 == y1 && x2 == y2 {
        return t;
    }

    let mut s = t;
    for _ in 0..8 {
        let err = cubic_bezier(x1, x2, s) - t;
        if err.abs() < 1e-9 {
            return cubic_bezier(y1, y2, s);
        }
        let slope = cubic_bezier_slope(x1, x2, s);
        if slope.abs() < 1e-7 {
            break;
        }
        s -= err / slope;
    }

    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    s = t;
    for _ in 0..64 {
        let x = cubic_bezier(x1, x2, s);
        if (x - t).abs() < 1e-9 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    cubic_bezier(y1, y2, s)
}
