//! Scalar helpers shared by the interpolator and the spring resolver.

/// Linear interpolation of scalars.
///
/// Exact at both ends: `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 {
        a
    } else if t == 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// Position of `x` within `[a, b]` as a fraction; unbounded outside the range.
#[inline]
pub fn inverse_lerp(a: f64, b: f64, x: f64) -> f64 {
    (x - a) / (b - a)
}

/// Fold `x` periodically into `[min, max)`.
#[inline]
pub fn wrap_into(x: f64, min: f64, max: f64) -> f64 {
    (x - min).rem_euclid(max - min) + min
}

/// Index `i` of the segment `[range[i], range[i + 1]]` used for `input`.
///
/// Picks the first interior point at or past `input`; inputs beyond the last
/// point use the final segment and inputs before the first use segment 0.
/// `range` must hold at least two points.
pub fn find_segment(input: f64, range: &[f64]) -> usize {
    let last = range.len() - 1;
    (1..last).find(|&i| range[i] >= input).unwrap_or(last) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        assert_eq!(lerp(0.1, 0.7, 0.0), 0.1);
        assert_eq!(lerp(0.1, 0.7, 1.0), 0.7);
        assert_eq!(lerp(0.0, 1.0, 0.5), 0.5);
        assert_eq!(lerp(0.0, 1.0, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn wrap_is_periodic() {
        assert_eq!(wrap_into(35.0, 0.0, 30.0), 5.0);
        assert_eq!(wrap_into(-5.0, 0.0, 30.0), 25.0);
        assert_eq!(wrap_into(60.0, 0.0, 30.0), 0.0);
    }

    #[test]
    fn segment_lookup() {
        let r = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(find_segment(-5.0, &r), 0);
        assert_eq!(find_segment(0.0, &r), 0);
        assert_eq!(find_segment(10.0, &r), 0);
        assert_eq!(find_segment(10.5, &r), 1);
        assert_eq!(find_segment(25.0, &r), 2);
        assert_eq!(find_segment(99.0, &r), 2);
        assert_eq!(find_segment(99.0, &[0.0, 1.0]), 0);
    }
}
