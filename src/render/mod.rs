//! Map scene adapters.
//!
//! Every provider gets the same input (center, radius, amenity markers) and
//! produces a JSON scene its front-end widget can consume directly. The
//! terminal plot lives alongside them for the CLI.

pub mod ascii;
pub mod geojson;
pub mod google;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amenities::{Amenity, Category};
use crate::location::{Coordinate, US_CENTER_LAT, US_CENTER_LNG};
use crate::search::SearchReport;

pub use ascii::render_ascii_map;
pub use geojson::GeoJsonAdapter;
pub use google::GoogleMapsAdapter;

pub const CENTER_COLOR: &str = "#3B82F6";
pub const MARKER_STROKE: &str = "#FFFFFF";
pub const CIRCLE_FILL_OPACITY: f64 = 0.15;
pub const CIRCLE_STROKE_OPACITY: f64 = 0.5;
pub const CIRCLE_STROKE_WEIGHT: u32 = 2;
pub const FOCUSED_ZOOM: u8 = 14;
pub const OVERVIEW_ZOOM: u8 = 3;

pub fn marker_color(category: Category) -> &'static str {
    match category {
        Category::Hospital => "#EC4899",
        Category::School => "#22C55E",
        Category::Transport => "#F59E0B",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    Google,
    Mapbox,
    MapLibre,
}

impl fmt::Display for MapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Mapbox => write!(f, "mapbox"),
            Self::MapLibre => write!(f, "maplibre"),
        }
    }
}

impl FromStr for MapProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "googlemaps" => Ok(Self::Google),
            "mapbox" => Ok(Self::Mapbox),
            "maplibre" | "osm" => Ok(Self::MapLibre),
            other => Err(format!(
                "Unknown map provider '{}'. Use 'google', 'mapbox' or 'maplibre'.",
                other
            )),
        }
    }
}

/// What every adapter draws: an optional focus point, its radius, and markers.
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    pub center: Option<&'a Coordinate>,
    pub radius_km: f64,
    pub amenities: &'a [Amenity],
}

impl<'a> MapView<'a> {
    pub fn new(center: Option<&'a Coordinate>, radius_km: f64, amenities: &'a [Amenity]) -> Self {
        Self {
            center,
            radius_km,
            amenities,
        }
    }

    pub fn from_report(report: &'a SearchReport) -> Self {
        Self::new(Some(&report.location), report.radius_km, &report.amenities)
    }

    /// Markers are only meaningful around a resolved location.
    pub fn markers(&self) -> &'a [Amenity] {
        if self.center.is_some() {
            self.amenities
        } else {
            &[]
        }
    }

    pub fn focus(&self) -> (f64, f64) {
        self.center
            .map(|c| (c.lat, c.lng))
            .unwrap_or((US_CENTER_LAT, US_CENTER_LNG))
    }

    pub fn zoom(&self) -> u8 {
        if self.center.is_some() {
            FOCUSED_ZOOM
        } else {
            OVERVIEW_ZOOM
        }
    }
}

/// A map provider binding.
pub trait MapAdapter: Send + Sync {
    fn provider(&self) -> MapProvider;

    fn render(&self, view: &MapView<'_>) -> serde_json::Value;
}

pub fn adapter_for(provider: MapProvider) -> Box<dyn MapAdapter> {
    match provider {
        MapProvider::Google => Box::new(GoogleMapsAdapter),
        MapProvider::Mapbox => Box::new(GeoJsonAdapter::mapbox()),
        MapProvider::MapLibre => Box::new(GeoJsonAdapter::maplibre()),
    }
}
