/// ease_out_cubic returns the cubic ease-out value at progress t.
/// t is expected in [0, 1]; the result starts fast and settles at 1.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// ease_in_out returns a symmetric ease-in-out value at progress t:
/// 2t^2 below the midpoint, 1 - (-2t + 2)^2 / 2 above it.
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// clamp01 limits a progress value to the [0, 1] range.
pub fn clamp01(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_relative_eq!(ease_out_cubic(0.0), 0.0);
        assert_relative_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        assert_relative_eq!(ease_in_out(0.0), 0.0);
        assert_relative_eq!(ease_in_out(0.5), 0.5);
        assert_relative_eq!(ease_in_out(1.0), 1.0);
        assert_relative_eq!(ease_in_out(0.25) + ease_in_out(0.75), 1.0);
    }

    #[test]
    fn clamp01_limits_range() {
        assert_relative_eq!(clamp01(-0.3), 0.0);
        assert_relative_eq!(clamp01(0.3), 0.3);
        assert_relative_eq!(clamp01(1.7), 1.0);
    }
}
