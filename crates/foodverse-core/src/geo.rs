//! One-shot location lookup with a fixed fallback coordinate.
//!
//! A [`LocationProvider`] is asked once for the current position. Any failure
//! is absorbed into the fallback: callers always get a usable coordinate and
//! learn from [`LocationSource`] where it came from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Central Jakarta, used when no device location is available.
    pub const JAKARTA: Coordinate = Coordinate {
        latitude: -6.2088,
        longitude: 106.8456,
    };

    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and within
    /// `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("location services are unavailable")]
    Unavailable,

    #[error("location permission denied")]
    Denied,

    #[error("invalid coordinate: {0}")]
    Invalid(String),
}

/// Source of a single position read.
pub trait LocationProvider {
    /// Reads the current position once.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] when the position cannot be determined.
    fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Always reports the wrapped coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// Stands in for a platform without a location API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Reads `FOODVERSE_LAT` / `FOODVERSE_LNG` from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocation;

impl EnvLocation {
    fn from_lookup<F>(lookup: F) -> Result<Coordinate, LocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (Some(lat), Some(lng)) = (lookup("FOODVERSE_LAT"), lookup("FOODVERSE_LNG")) else {
            return Err(LocationError::Unavailable);
        };
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| LocationError::Invalid(format!("{raw}: {e}")))
        };
        Ok(Coordinate::new(parse(&lat)?, parse(&lng)?))
    }
}

impl LocationProvider for EnvLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Asks `provider` for the current position once, falling back to
/// `fallback` on any error or out-of-range reading. Never retries.
pub fn resolve_location<P>(provider: &P, fallback: Coordinate) -> ResolvedLocation
where
    P: LocationProvider + ?Sized,
{
    match provider.current_position() {
        Ok(coordinate) if coordinate.is_valid() => ResolvedLocation {
            coordinate,
            source: LocationSource::Device,
        },
        Ok(coordinate) => {
            tracing::warn!(%coordinate, %fallback, "device reported an out-of-range position, using fallback");
            ResolvedLocation {
                coordinate: fallback,
                source: LocationSource::Fallback,
            }
        }
        Err(error) => {
            tracing::debug!(%error, %fallback, "device location unavailable, using fallback");
            ResolvedLocation {
                coordinate: fallback,
                source: LocationSource::Fallback,
            }
        }
    }
}

/// Great-circle distance in kilometres (haversine, earth radius 6371 km).
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
