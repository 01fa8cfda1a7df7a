//! Trigger facing angles
//!
//! Azimuths are degrees clockwise from screen-up, always kept in [0, 360).

use serde::{Deserialize, Deserializer, Serialize};

/// A facing angle in degrees, normalized to [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Azimuth(f64);

impl Azimuth {
    pub const NORTH: Azimuth = Azimuth(0.0);

    /// Normalize any finite angle into [0, 360). Non-finite input maps to 0.
    pub fn new(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self::NORTH;
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if normalized >= 360.0 {
            Self::NORTH
        } else {
            Self(normalized)
        }
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Direction in screen-space degrees (0 = +x axis, clockwise because y grows downward)
    pub fn screen_angle(self) -> f64 {
        (self.0 - 90.0).rem_euclid(360.0)
    }
}

impl From<f64> for Azimuth {
    fn from(degrees: f64) -> Self {
        Self::new(degrees)
    }
}

impl<'de> Deserialize<'de> for Azimuth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Main and sub trigger facings of one unit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerDirection {
    pub main: Azimuth,
    pub sub: Azimuth,
}

impl TriggerDirection {
    pub fn new(main: Azimuth, sub: Azimuth) -> Self {
        Self { main, sub }
    }
}
