use crate::error::{TimelineError, TimelineResult};

/// Continuous linear mapping from a numeric domain onto a pixel range.
///
/// The domain must have a non-zero finite span. The range may collapse to a
/// single pixel; in that case the inverse mapping returns `domain.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> TimelineResult<Self> {
        let (domain_start, domain_end) = domain;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(TimelineError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        let (range_start, range_end) = range;
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(TimelineError::InvalidViewport {
                width: range_end - range_start,
                height: 0.0,
            });
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> TimelineResult<f64> {
        if !value.is_finite() {
            return Err(TimelineError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> TimelineResult<f64> {
        if !pixel.is_finite() {
            return Err(TimelineError::InvalidData("pixel must be finite".to_owned()));
        }

        let extent = self.range_end - self.range_start;
        if extent == 0.0 {
            return Ok(self.domain_start);
        }
        let normalized = (pixel - self.range_start) / extent;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}
