//! Observer position on the Earth's surface.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PositionError;
use crate::constants::DEFAULT_ELEVATION;

/// A geographic position in decimal degrees.
///
/// Elevation (meters above sea level) only affects the sun event calculator,
/// where it lowers the apparent horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
}

fn default_elevation() -> f64 {
    DEFAULT_ELEVATION
}

impl GeoPosition {
    /// Create a position at the default observer elevation.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: DEFAULT_ELEVATION,
        }
    }

    pub fn with_elevation(self, elevation: f64) -> Self {
        Self { elevation, ..self }
    }

    /// Check latitude and longitude ranges. Non-finite values are rejected.
    pub fn validate(&self) -> Result<(), PositionError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PositionError::Latitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PositionError::Longitude(self.longitude));
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), additionally checking the elevation.
    pub fn validate_with_elevation(&self) -> Result<(), PositionError> {
        self.validate()?;
        if !self.elevation.is_finite() || self.elevation < 0.0 {
            return Err(PositionError::Elevation(self.elevation));
        }
        Ok(())
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{ns}, {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
