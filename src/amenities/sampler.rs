//! Simulated nearby-amenity search.
//!
//! For each category, 3–7 points are scattered around the center. The
//! distance is drawn uniformly on [0, radius), not uniformly over the disc's
//! area, so points cluster toward the center. Offsets use a flat-Earth
//! approximation that is only reasonable for small radii away from the poles.

use std::f64::consts::TAU;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use super::types::{Amenity, Category, SamplingError};
use crate::config::AppConfig;
use crate::location::{Coordinate, Credential};

/// Length of one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

pub const MIN_PER_CATEGORY: usize = 3;
pub const MAX_PER_CATEGORY: usize = 7;

#[derive(Debug, Clone)]
pub struct AmenitySampler {
    delay: Duration,
}

impl AmenitySampler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Duration::from_millis(config.places_delay_ms))
    }

    /// No artificial delay.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Produce a fresh batch of amenities within `radius_km` of `center`.
    ///
    /// The credential is part of the provider contract; the simulated
    /// strategy does not use it.
    pub async fn sample<R>(
        &self,
        center: &Coordinate,
        radius_km: f64,
        _credential: &Credential,
        rng: &mut R,
    ) -> Result<Vec<Amenity>, SamplingError>
    where
        R: Rng + Send + ?Sized,
    {
        check_inputs(center, radius_km)?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let amenities = scatter(center, radius_km, rng);
        debug!(
            count = amenities.len(),
            radius_km,
            "Sampled amenities"
        );
        Ok(amenities)
    }
}

fn check_inputs(center: &Coordinate, radius_km: f64) -> Result<(), SamplingError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(SamplingError::InvalidRadius(radius_km));
    }
    if !center.is_valid() {
        return Err(SamplingError::InvalidCenter {
            lat: center.lat,
            lng: center.lng,
        });
    }
    Ok(())
}

/// Generate every category's batch, hospitals first, then schools, then
/// transport.
pub fn scatter<R: Rng + ?Sized>(center: &Coordinate, radius_km: f64, rng: &mut R) -> Vec<Amenity> {
    let mut out = Vec::with_capacity(Category::ALL.len() * MAX_PER_CATEGORY);
    for category in Category::ALL {
        let count = rng.random_range(MIN_PER_CATEGORY..=MAX_PER_CATEGORY);
        for i in 0..count {
            let theta = rng.random::<f64>() * TAU;
            let distance = rng.random::<f64>() * radius_km;
            let (lat, lng) = offset_point(center, distance, theta);
            out.push(Amenity {
                id: format!("{}-{}", category, i),
                name: synth_name(category, rng),
                category,
                lat,
                lng,
            });
        }
    }
    out
}

/// Move `distance_km` from `center` along bearing `theta` (radians from east,
/// counter-clockwise).
pub fn offset_point(center: &Coordinate, distance_km: f64, theta: f64) -> (f64, f64) {
    let lat_offset = distance_km * theta.sin() / KM_PER_DEGREE;
    let lng_offset = distance_km * theta.cos() / (KM_PER_DEGREE * center.lat.to_radians().cos());
    (center.lat + lat_offset, center.lng + lng_offset)
}

/// Inverse of [`offset_point`]: distance in km under the same approximation.
pub fn flat_distance_km(center: &Coordinate, lat: f64, lng: f64) -> f64 {
    let dy = (lat - center.lat) * KM_PER_DEGREE;
    let dx = (lng - center.lng) * KM_PER_DEGREE * center.lat.to_radians().cos();
    dx.hypot(dy)
}

fn synth_name<R: Rng + ?Sized>(category: Category, rng: &mut R) -> String {
    let templates = category.name_templates();
    let base = templates[rng.random_range(0..templates.len())];
    let suffix: u8 = rng.random_range(1..=10);
    format!("{} {}", base, suffix)
}
