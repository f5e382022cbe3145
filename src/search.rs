//! Address → coordinate → amenities, plus the caller-side display state.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::amenities::{Amenity, AmenitySampler, AmenitySummary, QapScore, SamplingError};
use crate::config::AppConfig;
use crate::location::{Address, AddressError, Coordinate, Credential, LocationResolver, ResolutionError};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

/// Everything one successful search produced.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub address: Address,
    pub location: Coordinate,
    pub amenities: Vec<Amenity>,
    pub summary: AmenitySummary,
    pub score: QapScore,
    pub radius_km: f64,
    pub searched_at: DateTime<Utc>,
}

impl SearchReport {
    pub fn headline(&self) -> String {
        format!(
            "Found {} places near {}",
            self.amenities.len(),
            self.address.street.trim()
        )
    }
}

/// One configured search pipeline.
#[derive(Debug, Clone)]
pub struct Search {
    resolver: LocationResolver,
    sampler: AmenitySampler,
    credential: Credential,
    radius_km: f64,
}

impl Search {
    pub fn new(
        resolver: LocationResolver,
        sampler: AmenitySampler,
        credential: Credential,
        radius_km: f64,
    ) -> Self {
        Self {
            resolver,
            sampler,
            credential,
            radius_km,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            LocationResolver::from_config(config),
            AmenitySampler::from_config(config),
            config.credential.clone(),
            config.radius_km,
        )
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn sampler(&self) -> &AmenitySampler {
        &self.sampler
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Validate, resolve, then sample. Any failure aborts the whole search.
    pub async fn run<R>(&self, address: &Address, rng: &mut R) -> Result<SearchReport, SearchError>
    where
        R: Rng + Send + ?Sized,
    {
        address.validate()?;

        let location = self
            .resolver
            .resolve(address, &self.credential, rng)
            .await
            .inspect_err(|e| warn!(error = %e, address = %address, "Resolution failed"))?;

        let amenities = self
            .sampler
            .sample(&location, self.radius_km, &self.credential, rng)
            .await
            .inspect_err(|e| warn!(error = %e, "Amenity sampling failed"))?;

        let summary = AmenitySummary::from_amenities(&amenities, self.radius_km);
        let score = QapScore::compute(&summary);

        info!(
            hospitals = summary.hospital,
            schools = summary.school,
            transport = summary.transport,
            score = score.percent,
            "Search complete"
        );

        Ok(SearchReport {
            address: address.clone(),
            location,
            amenities,
            summary,
            score,
            radius_km: self.radius_km,
            searched_at: Utc::now(),
        })
    }
}

/// What a front end currently shows. A failed search never leaves the
/// previous search's results on screen.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    pub location: Option<Coordinate>,
    pub amenities: Vec<Amenity>,
    pub error: Option<String>,
}

impl SearchState {
    pub fn apply(&mut self, outcome: &Result<SearchReport, SearchError>) {
        match outcome {
            Ok(report) => {
                self.location = Some(report.location.clone());
                self.amenities = report.amenities.clone();
                self.error = None;
            }
            Err(e) => {
                self.location = None;
                self.amenities.clear();
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.amenities.is_empty()
    }
}
