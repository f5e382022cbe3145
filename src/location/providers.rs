//! Geocoding providers: Mapbox (live) and the simulated jitter geocoder.

use super::types::{Address, Coordinate, Credential, ResolutionError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Geographic center of the contiguous United States.
pub const US_CENTER_LAT: f64 = 39.8283;
pub const US_CENTER_LNG: f64 = -98.5795;

// Full jitter span; half of it either side of the center.
const LAT_JITTER_DEG: f64 = 10.0;
const LNG_JITTER_DEG: f64 = 20.0;

pub const DEFAULT_MAPBOX_URL: &str = "https://api.mapbox.com";

const USER_AGENT: &str = concat!("AmenityFinder/", env!("CARGO_PKG_VERSION"));

/// RFC 3986 unreserved characters stay literal, everything else is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ─── Simulated provider ─────────────────────────────────────────

/// Ignores the address content and jitters the U.S. center point.
#[derive(Debug, Clone)]
pub struct SimulatedGeocoder {
    delay: Duration,
}

impl SimulatedGeocoder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn geocode<R>(
        &self,
        address: &Address,
        rng: &mut R,
    ) -> Result<Coordinate, ResolutionError>
    where
        R: Rng + Send + ?Sized,
    {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(jitter_us_center(address, rng))
    }
}

/// ±5° latitude and ±10° longitude around the continental center.
pub fn jitter_us_center<R: Rng + ?Sized>(address: &Address, rng: &mut R) -> Coordinate {
    let lat = US_CENTER_LAT + (rng.random::<f64>() - 0.5) * LAT_JITTER_DEG;
    let lng = US_CENTER_LNG + (rng.random::<f64>() - 0.5) * LNG_JITTER_DEG;
    Coordinate::new(lat, lng).with_address(address.one_line())
}

// ─── Mapbox provider ────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize, Debug)]
struct GeocodeFeature {
    /// `[lng, lat]`
    center: Vec<f64>,
    #[serde(default)]
    place_name: Option<String>,
}

/// Forward geocoding against the Mapbox Geocoding v5 API.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    base_url: String,
    timeout: Duration,
}

impl MapboxGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, timeout }
    }

    /// Full request URL for one address, US-only, single candidate.
    pub fn request_url(&self, address: &Address, token: &str) -> String {
        self.url_with_token(address, &utf8_percent_encode(token, COMPONENT).to_string())
    }

    /// Same URL with the access token masked, for logs.
    pub fn log_url(&self, address: &Address) -> String {
        self.url_with_token(address, "***")
    }

    fn url_with_token(&self, address: &Address, encoded_token: &str) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}&country=US&limit=1",
            self.base_url,
            utf8_percent_encode(&address.one_line(), COMPONENT),
            encoded_token,
        )
    }

    pub async fn geocode(
        &self,
        address: &Address,
        credential: &Credential,
    ) -> Result<Coordinate, ResolutionError> {
        let token = credential
            .as_deref()
            .ok_or(ResolutionError::MissingCredential)?;

        let url = self.request_url(address, token);
        debug!(url = %self.log_url(address), "Geocoding address");

        let timeout = self.timeout;
        let query = address.one_line();
        let result = tokio::task::spawn_blocking(move || fetch_first_feature(&url, timeout, &query))
            .await
            .map_err(|e| ResolutionError::Unreachable(e.to_string()))?;

        if let Err(ref e) = result {
            warn!(error = %e, "Geocoding failed");
        }
        result
    }
}

fn fetch_first_feature(
    url: &str,
    timeout: Duration,
    query: &str,
) -> Result<Coordinate, ResolutionError> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .timeout(timeout)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => ResolutionError::Status(code),
            ureq::Error::Transport(t) => ResolutionError::Unreachable(t.to_string()),
        })?;

    let body: GeocodeResponse = response
        .into_json()
        .map_err(|e| ResolutionError::InvalidResponse(e.to_string()))?;

    first_coordinate(body, query)
}

fn first_coordinate(body: GeocodeResponse, query: &str) -> Result<Coordinate, ResolutionError> {
    let feature = body
        .features
        .into_iter()
        .next()
        .ok_or_else(|| ResolutionError::NoResults(query.to_string()))?;

    let (lng, lat) = match feature.center.as_slice() {
        [lng, lat, ..] => (*lng, *lat),
        _ => {
            return Err(ResolutionError::InvalidResponse(
                "feature center must be [lng, lat]".into(),
            ))
        }
    };

    let coord = Coordinate {
        lat,
        lng,
        formatted_address: feature.place_name,
    };
    if !coord.is_valid() {
        return Err(ResolutionError::InvalidResponse(format!(
            "coordinate out of range: {}, {}",
            lat, lng
        )));
    }
    Ok(coord)
}
