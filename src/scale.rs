//! Linear and band scales used by the layout engine.

/// Maps a continuous domain onto a pixel range. The range may be reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `v` from the domain to the range. A degenerate domain maps everything to the range start.
    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return r0;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Splits a pixel range into equal bands, one per key, with proportional padding.
///
/// Inner and outer padding are the same ratio and the bands are centred in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let (r0, r1) = range;
        let n = keys.len() as f64;
        let padding = padding.clamp(0.0, 1.0);
        // Guard the empty-domain division: one virtual step.
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            keys,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Top edge of the first band whose key equals `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + self.step * i as f64)
    }

    /// Top edge of the band at `index`.
    pub fn position_at(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_decreases() {
        let s = LinearScale::new((0.0, 100.0), (402.0, 0.0));
        assert_eq!(s.map(0.0), 402.0);
        assert_eq!(s.map(100.0), 0.0);
        assert!(s.map(25.0) > s.map(75.0));
    }

    #[test]
    fn zero_domain_is_flat() {
        let s = LinearScale::new((0.0, 0.0), (0.0, 402.0));
        assert_eq!(s.map(0.0), 0.0);
        assert!(s.map(0.0).is_finite());
    }

    #[test]
    fn bands_tile_the_range() {
        let b = BandScale::new(vec!["a".into(), "b".into()], (-30.0, 618.0), 0.1);
        // n=2, p=0.1: step = 648 / 2.1
        let step = 648.0 / 2.1;
        assert!((b.step() - step).abs() < 1e-9);
        assert!((b.bandwidth() - step * 0.9).abs() < 1e-9);
        assert!((b.position("a").unwrap() - (-30.0 + step * 0.1)).abs() < 1e-9);
        assert!((b.position("b").unwrap() - b.position("a").unwrap() - step).abs() < 1e-9);
        // symmetric outer padding
        let last_bottom = b.position("b").unwrap() + b.bandwidth();
        assert!((618.0 - last_bottom - step * 0.1).abs() < 1e-9);
    }

    #[test]
    fn empty_band_scale_does_not_divide_by_zero() {
        let b = BandScale::new(vec![], (0.0, 100.0), 0.1);
        assert!(b.step().is_finite());
        assert_eq!(b.position("x"), None);
    }
}
