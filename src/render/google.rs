//! Google Maps JS scene: a center marker, a radius circle and one symbol
//! marker per amenity.

use serde_json::{json, Value};

use super::{
    marker_color, MapAdapter, MapProvider, MapView, CENTER_COLOR, CIRCLE_FILL_OPACITY,
    CIRCLE_STROKE_OPACITY, CIRCLE_STROKE_WEIGHT, MARKER_STROKE,
};

const MARKER_SCALE: u32 = 8;
const CENTER_SCALE: u32 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMapsAdapter;

impl MapAdapter for GoogleMapsAdapter {
    fn provider(&self) -> MapProvider {
        MapProvider::Google
    }

    fn render(&self, view: &MapView<'_>) -> Value {
        let (lat, lng) = view.focus();

        let mut markers = Vec::with_capacity(view.markers().len() + 1);
        let circle = match view.center {
            Some(c) => {
                markers.push(json!({
                    "position": { "lat": c.lat, "lng": c.lng },
                    "title": c.formatted_address.as_deref().unwrap_or("Selected location"),
                    "category": "center",
                    "color": CENTER_COLOR,
                    "scale": CENTER_SCALE,
                    "strokeColor": MARKER_STROKE,
                }));
                json!({
                    "center": { "lat": c.lat, "lng": c.lng },
                    "radius_m": view.radius_km * 1000.0,
                    "fillColor": CENTER_COLOR,
                    "fillOpacity": CIRCLE_FILL_OPACITY,
                    "strokeColor": CENTER_COLOR,
                    "strokeWeight": CIRCLE_STROKE_WEIGHT,
                    "strokeOpacity": CIRCLE_STROKE_OPACITY,
                })
            }
            None => Value::Null,
        };

        for a in view.markers() {
            markers.push(json!({
                "position": { "lat": a.lat, "lng": a.lng },
                "title": a.name,
                "category": a.category,
                "color": marker_color(a.category),
                "scale": MARKER_SCALE,
                "strokeColor": MARKER_STROKE,
            }));
        }

        json!({
            "provider": self.provider(),
            "center": { "lat": lat, "lng": lng },
            "zoom": view.zoom(),
            "circle": circle,
            "markers": markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenities::{Amenity, Category};
    use crate::location::Coordinate;

    #[test]
    fn test_scene_with_location() {
        let c = Coordinate::new(40.0, -74.0).with_address("Somewhere, NY");
        let amenities = [Amenity {
            id: "hospital-0".into(),
            name: "Health Clinic 4".into(),
            category: Category::Hospital,
            lat: 40.001,
            lng: -74.002,
        }];
        let scene = GoogleMapsAdapter.render(&MapView::new(Some(&c), 1.0, &amenities));

        assert_eq!(scene["provider"], "google");
        assert_eq!(scene["zoom"], 14);
        assert_eq!(scene["circle"]["radius_m"], 1000.0);
        assert_eq!(scene["markers"].as_array().unwrap().len(), 2);
        assert_eq!(scene["markers"][0]["title"], "Somewhere, NY");
        assert_eq!(scene["markers"][1]["color"], "#EC4899");
        assert_eq!(scene["markers"][1]["category"], "hospital");
    }

    #[test]
    fn test_scene_without_location() {
        let scene = GoogleMapsAdapter.render(&MapView::new(None, 1.0, &[]));
        assert!(scene["circle"].is_null());
        assert_eq!(scene["zoom"], 3);
        assert!(scene["markers"].as_array().unwrap().is_empty());
    }
}
