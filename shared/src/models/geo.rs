//! Coordinate Model

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees
///
/// Accepts the `latitude`/`longitude` spelling used by map widgets on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite (no NaN / infinity)
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Linear interpolation towards `target`.
    ///
    /// `fraction` 0.0 returns `self`; 1.0 returns `target` exactly, without the
    /// rounding residue `a + (b - a) * 1.0` can leave behind.
    pub fn lerp(&self, target: &Coordinates, fraction: f64) -> Coordinates {
        if fraction >= 1.0 {
            return *target;
        }
        if fraction <= 0.0 {
            return *self;
        }
        Coordinates {
            lat: self.lat + (target.lat - self.lat) * fraction,
            lng: self.lng + (target.lng - self.lng) * fraction,
        }
    }
}

/// Simulated courier position; derived, never persisted
pub type DeliveryPosition = Coordinates;
