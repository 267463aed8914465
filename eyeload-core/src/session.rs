use serde::{Deserialize, Serialize};

/// Maps a pixel value onto [-1, 1] across `extent`, with 0 at the centre.
pub fn normalize(value: f64, extent: f64) -> f64 {
    2.0 * (value / extent - 0.5)
}

/// Global recording constants, read once from the session headers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParameters {
    display_width: f64,
    display_height: f64,
    sample_rate_hz: f64,
}

impl SessionParameters {
    pub fn new(display_width: f64, display_height: f64, sample_rate_hz: f64) -> Self {
        Self {
            display_width,
            display_height,
            sample_rate_hz,
        }
    }

    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    pub fn display_height(&self) -> f64 {
        self.display_height
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn normalize_x(&self, x: f64) -> f64 {
        normalize(x, self.display_width)
    }

    pub fn normalize_y(&self, y: f64) -> f64 {
        normalize(y, self.display_height)
    }

    /// Normalizes an (x, y) pixel pair into the session coordinate system
    pub fn normalize_point(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [self.normalize_x(x), self.normalize_y(y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalization_maps_extent_to_unit_range() {
        assert_eq!(normalize(512.0, 1024.0), 0.0);
        assert_eq!(normalize(1024.0, 1024.0), 1.0);
        assert_eq!(normalize(0.0, 1024.0), -1.0);
    }

    #[test]
    fn axes_use_their_own_extent() {
        let params = SessionParameters::new(1024.0, 768.0, 1000.0);
        assert_eq!(params.normalize_point([512.0, 384.0]), [0.0, 0.0]);
        assert_eq!(params.normalize_y(768.0), 1.0);
        assert_eq!(params.normalize_x(768.0), 0.5);
    }

    #[test]
    fn missing_values_stay_missing() {
        let params = SessionParameters::new(1024.0, 768.0, 1000.0);
        assert!(params.normalize_x(f64::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn on_screen_values_stay_in_unit_range(
            extent in 1.0f64..10_000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let norm = normalize(fraction * extent, extent);
            prop_assert!((-1.0..=1.0).contains(&norm), "{norm}");
            prop_assert!(normalize(extent / 2.0, extent).abs() < 1e-12);
        }
    }
}
