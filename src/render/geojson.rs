//! GeoJSON scene for WebGL map libraries (Mapbox GL JS, MapLibre GL JS).
//!
//! Both libraries take the same source; they differ only in the base style
//! and whether it needs an access token.

use std::f64::consts::TAU;

use serde_json::{json, Value};

use super::{
    marker_color, MapAdapter, MapProvider, MapView, CENTER_COLOR, CIRCLE_FILL_OPACITY,
    CIRCLE_STROKE_OPACITY, CIRCLE_STROKE_WEIGHT,
};
use crate::amenities::offset_point;
use crate::location::Coordinate;

pub const MAPBOX_STYLE: &str = "mapbox://styles/mapbox/streets-v12";
pub const MAPLIBRE_STYLE: &str = "https://demotiles.maplibre.org/style.json";

/// Vertices approximating the radius circle.
pub const CIRCLE_VERTICES: usize = 64;

#[derive(Debug, Clone)]
pub struct GeoJsonAdapter {
    provider: MapProvider,
    style: &'static str,
}

impl GeoJsonAdapter {
    pub fn mapbox() -> Self {
        Self {
            provider: MapProvider::Mapbox,
            style: MAPBOX_STYLE,
        }
    }

    pub fn maplibre() -> Self {
        Self {
            provider: MapProvider::MapLibre,
            style: MAPLIBRE_STYLE,
        }
    }

    pub fn requires_token(&self) -> bool {
        self.provider == MapProvider::Mapbox
    }
}

impl MapAdapter for GeoJsonAdapter {
    fn provider(&self) -> MapProvider {
        self.provider
    }

    fn render(&self, view: &MapView<'_>) -> Value {
        let (lat, lng) = view.focus();
        let mut features = Vec::new();

        if let Some(c) = view.center {
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [circle_ring(c, view.radius_km)] },
                "properties": {
                    "kind": "radius",
                    "radius_km": view.radius_km,
                    "fill-color": CENTER_COLOR,
                    "fill-opacity": CIRCLE_FILL_OPACITY,
                    "line-width": CIRCLE_STROKE_WEIGHT,
                    "line-opacity": CIRCLE_STROKE_OPACITY,
                },
            }));
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [c.lng, c.lat] },
                "properties": {
                    "kind": "center",
                    "name": c.formatted_address.as_deref().unwrap_or("Selected location"),
                    "color": CENTER_COLOR,
                },
            }));
        }

        for a in view.markers() {
            features.push(json!({
                "type": "Feature",
                "id": a.id,
                "geometry": { "type": "Point", "coordinates": [a.lng, a.lat] },
                "properties": {
                    "kind": "amenity",
                    "name": a.name,
                    "category": a.category,
                    "color": marker_color(a.category),
                },
            }));
        }

        json!({
            "provider": self.provider,
            "style": self.style,
            "requiresToken": self.requires_token(),
            "center": [lng, lat],
            "zoom": view.zoom(),
            "source": {
                "type": "FeatureCollection",
                "features": features,
            },
        })
    }
}

/// Closed `[lng, lat]` ring around `center`.
fn circle_ring(center: &Coordinate, radius_km: f64) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = (0..CIRCLE_VERTICES)
        .map(|i| {
            let theta = TAU * i as f64 / CIRCLE_VERTICES as f64;
            let (lat, lng) = offset_point(center, radius_km, theta);
            [lng, lat]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenities::{flat_distance_km, Amenity, Category};
    use approx::assert_relative_eq;

    #[test]
    fn test_ring_closed_and_on_radius() {
        let c = Coordinate::new(34.05, -118.24);
        let ring = circle_ring(&c, 1.0);
        assert_eq!(ring.len(), CIRCLE_VERTICES + 1);
        assert_eq!(ring.first(), ring.last());
        for [lng, lat] in &ring {
            assert_relative_eq!(flat_distance_km(&c, *lat, *lng), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_maplibre_scene() {
        let c = Coordinate::new(34.05, -118.24);
        let amenities = [Amenity {
            id: "transport-0".into(),
            name: "Train Stop 2".into(),
            category: Category::Transport,
            lat: 34.051,
            lng: -118.241,
        }];
        let scene = GeoJsonAdapter::maplibre().render(&MapView::new(Some(&c), 1.0, &amenities));

        assert_eq!(scene["provider"], "maplibre");
        assert_eq!(scene["requiresToken"], false);
        assert_eq!(scene["center"][0], -118.24);
        let features = scene["source"]["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[2]["id"], "transport-0");
        assert_eq!(features[2]["geometry"]["coordinates"][1], 34.051);
        assert_eq!(features[2]["properties"]["color"], "#F59E0B");
    }

    #[test]
    fn test_mapbox_needs_token() {
        let scene = GeoJsonAdapter::mapbox().render(&MapView::new(None, 1.0, &[]));
        assert_eq!(scene["style"], MAPBOX_STYLE);
        assert_eq!(scene["requiresToken"], true);
        assert!(scene["source"]["features"].as_array().unwrap().is_empty());
    }
}
