use super::LayoutError;

/// Linear factor converting `sqrt(real-world area)` into pixels.
///
/// The canvas is treated as holding `max_area` square units; `shrink` leaves
/// slack so the densest legal distribution does not touch the canvas edges.
pub fn scale_factor(
    canvas_w: f64,
    canvas_h: f64,
    max_area: f64,
    shrink: f64,
) -> Result<f64, LayoutError> {
    if !(canvas_w > 0.0 && canvas_h > 0.0) {
        return Err(LayoutError::InvalidCanvas {
            width: canvas_w,
            height: canvas_h,
        });
    }
    if !(max_area > 0.0) {
        return Err(LayoutError::NonPositiveMaxArea(max_area));
    }
    Ok(((canvas_w * canvas_h) / max_area).sqrt() * shrink)
}

/// Pixel side of one instance with the given unit area.
#[inline]
pub fn side_length(unit_area: f64, scale: f64) -> f64 {
    unit_area.sqrt() * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_canvas_scale() {
        let scale = scale_factor(900.0, 650.0, 50.0, 0.85).unwrap();
        assert_relative_eq!(scale, (585_000.0f64 / 50.0).sqrt() * 0.85);
        assert!((scale - 92.0).abs() < 0.1);
    }

    #[test]
    fn side_grows_with_square_root_of_area() {
        let scale = 92.0;
        assert_relative_eq!(side_length(1.0, scale), 92.0);
        assert_relative_eq!(side_length(4.0, scale), 184.0);
        assert!(side_length(0.25, scale) < side_length(0.36, scale));
    }

    #[test]
    fn rejects_non_positive_max_area() {
        assert!(matches!(
            scale_factor(900.0, 650.0, 0.0, 0.85),
            Err(LayoutError::NonPositiveMaxArea(_))
        ));
        assert!(scale_factor(900.0, 650.0, -5.0, 0.85).is_err());
        assert!(scale_factor(900.0, 650.0, f64::NAN, 0.85).is_err());
    }

    #[test]
    fn rejects_empty_canvas() {
        assert!(matches!(
            scale_factor(0.0, 650.0, 50.0, 0.85),
            Err(LayoutError::InvalidCanvas { .. })
        ));
        assert!(scale_factor(900.0, -1.0, 50.0, 0.85).is_err());
    }
}
