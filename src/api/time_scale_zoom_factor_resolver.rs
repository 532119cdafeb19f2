use crate::error::{TimelineError, TimelineResult};

const WHEEL_STEP_UNITS: f64 = 120.0;

/// Converts a wheel delta into a multiplicative zoom factor,
/// `(1 + step)^(-delta / 120)`. Negative deltas zoom in.
pub(super) fn resolve_wheel_zoom_factor(
    wheel_delta_y: f64,
    zoom_step_ratio: f64,
) -> TimelineResult<Option<f64>> {
    if !wheel_delta_y.is_finite() {
        return Err(TimelineError::InvalidData(
            "wheel delta must be finite".to_owned(),
        ));
    }
    if wheel_delta_y == 0.0 {
        return Ok(None);
    }

    let normalized_steps = wheel_delta_y / WHEEL_STEP_UNITS;
    let base = 1.0 + zoom_step_ratio;
    let factor = base.powf(-normalized_steps);
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TimelineError::InvalidData(
            "computed wheel zoom factor must be finite and > 0".to_owned(),
        ));
    }
    Ok(Some(factor))
}

#[cfg(test)]
mod tests {
    use super::resolve_wheel_zoom_factor;
    use approx::assert_relative_eq;

    #[test]
    fn zero_wheel_delta_returns_none() {
        let factor = resolve_wheel_zoom_factor(0.0, 0.1).expect("factor");
        assert!(factor.is_none());
    }

    #[test]
    fn one_notch_up_zooms_in_by_step() {
        let factor = resolve_wheel_zoom_factor(-120.0, 0.1)
            .expect("factor")
            .expect("some");
        assert_relative_eq!(factor, 1.1);
    }

    #[test]
    fn opposite_notches_cancel_out() {
        let zoom_in = resolve_wheel_zoom_factor(-240.0, 0.1)
            .expect("factor")
            .expect("some");
        let zoom_out = resolve_wheel_zoom_factor(240.0, 0.1)
            .expect("factor")
            .expect("some");
        assert_relative_eq!(zoom_in * zoom_out, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_delta_is_rejected() {
        assert!(resolve_wheel_zoom_factor(f64::INFINITY, 0.1).is_err());
    }
}
