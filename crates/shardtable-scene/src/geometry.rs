//! Geometry limits and clamping.
//!
//! Coordinates are percentages of the scene bounds. All limits are enforced
//! by clamping: an out-of-range value is pulled back silently rather than
//! rejected, so a wild pointer can never invalidate the document.

/// Lower bound of a scene coordinate, in percent.
pub const COORD_MIN: f64 = 0.0;

/// Upper bound of a scene coordinate, in percent.
pub const COORD_MAX: f64 = 100.0;

/// Smallest allowed token scale multiplier.
pub const MIN_TOKEN_SCALE: f64 = 0.3;

/// Smallest allowed occluding-shape width or height, in percent.
pub const MIN_SHAPE_SPAN: f64 = 2.0;

/// Clamps a coordinate into the scene bounds.
#[must_use]
pub fn clamp_coord(value: f64) -> f64 {
    value.clamp(COORD_MIN, COORD_MAX)
}

/// Clamps a token scale to its floor. Rotation is deliberately unbounded.
#[must_use]
pub fn clamp_scale(value: f64) -> f64 {
    value.max(MIN_TOKEN_SCALE)
}

/// Clamps a shape width or height to its floor.
#[must_use]
pub fn clamp_span(value: f64) -> f64 {
    value.max(MIN_SHAPE_SPAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_coord_bounds() {
        assert_eq!(clamp_coord(-3.5), 0.0);
        assert_eq!(clamp_coord(50.0), 50.0);
        assert_eq!(clamp_coord(120.0), 100.0);
    }

    #[test]
    fn test_clamp_scale_floor() {
        assert_eq!(clamp_scale(0.1), MIN_TOKEN_SCALE);
        assert_eq!(clamp_scale(1.4), 1.4);
    }

    #[test]
    fn test_clamp_span_floor() {
        assert_eq!(clamp_span(1.0), MIN_SHAPE_SPAN);
        assert_eq!(clamp_span(20.0), 20.0);
    }
}
