use std::f64::consts::PI;

/// 90 degrees
pub const HALF_PI: f64 = PI / 2.0;
/// 45 degrees, one phase cycle of the ball texture
pub const QUARTER_PI: f64 = PI / 4.0;
/// 22.5 degrees, the spacing between lattice bands
pub const EIGHTH_PI: f64 = PI / 8.0;
pub const TWO_PI: f64 = PI * 2.0;

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Rotates a point around the origin using precomputed sine and cosine
pub fn rotate(x: f64, y: f64, sin_a: f64, cos_a: f64) -> (f64, f64) {
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// Wraps a value into `[0, period)`
///
/// `%` on floats is an exact fmod, so the only way to land outside the range
/// is a negative input rounding up to `period` after the correction.
pub fn wrap(value: f64, period: f64) -> f64 {
    let mut wrapped = value % period;
    if wrapped < 0.0 {
        wrapped += period;
    }
    if wrapped >= period {
        wrapped = 0.0;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_values_in_range() {
        assert_eq!(wrap(QUARTER_PI, QUARTER_PI), 0.0);
        assert!((wrap(QUARTER_PI + 0.1, QUARTER_PI) - 0.1).abs() < 1e-12);
        let negative = wrap(-0.1, QUARTER_PI);
        assert!((0.0..QUARTER_PI).contains(&negative));
        assert!((negative - (QUARTER_PI - 0.1)).abs() < 1e-12);
        assert!((0.0..QUARTER_PI).contains(&wrap(-1e-18, QUARTER_PI)));
    }

    #[test]
    fn rotate_quarter_turn() {
        let (x, y) = rotate(1.0, 0.0, 1.0, 0.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn edge_function_sign_follows_winding() {
        let a = [0.0, 0.0];
        let b = [4.0, 0.0];
        assert!(edge_function(&a, &b, &[2.0, 2.0]) < 0.0);
        assert!(edge_function(&a, &b, &[2.0, -2.0]) > 0.0);
    }
}
