//! Defines the validated geographic coordinate that every request is made for.

use crate::error::MeteoError;
use std::fmt;

/// A geographical point with an optional human-readable label.
///
/// Latitude must lie in `-90.0..=90.0` and longitude in `-180.0..=180.0`.
/// Values outside those ranges (or NaN) are rejected by [`LocationCoordinate::new`].
///
/// # Examples
///
/// ```
/// use meteo_pipeline::LocationCoordinate;
///
/// let london = LocationCoordinate::new(51.5074, -0.1278)?.with_label("London");
/// assert_eq!(london.label(), Some("London"));
/// # Ok::<(), meteo_pipeline::MeteoError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCoordinate {
    latitude: f64,
    longitude: f64,
    label: Option<String>,
}

impl LocationCoordinate {
    /// Creates a coordinate after checking the latitude and longitude ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MeteoError::InvalidCoordinate`] if either value is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MeteoError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(MeteoError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
            label: None,
        })
    }

    /// Attaches a display label such as a city name or postcode.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Formats as `label (lat, lon)` with two decimals, or just the coordinates when unlabelled.
impl fmt::Display for LocationCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(
                f,
                "{} ({:.2}, {:.2})",
                label, self.latitude, self.longitude
            ),
            None => write!(f, "({:.2}, {:.2})", self.latitude, self.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_boundary_values() {
        assert!(LocationCoordinate::new(90.0, 180.0).is_ok());
        assert!(LocationCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = LocationCoordinate::new(91.0, 0.0).unwrap_err();
        assert!(matches!(err, MeteoError::InvalidCoordinate { latitude, .. } if latitude == 91.0));
        assert!(LocationCoordinate::new(0.0, -180.5).is_err());
        assert!(LocationCoordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_display_with_and_without_label() {
        let plain = LocationCoordinate::new(51.5074, -0.1278).unwrap();
        assert_eq!(plain.to_string(), "(51.51, -0.13)");
        assert_eq!(
            plain.with_label("London").to_string(),
            "London (51.51, -0.13)"
        );
    }
}
