use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::amenities::{Amenity, SamplingError};
use crate::location::{Address, AddressError, Coordinate, ResolutionError};
use crate::render::{adapter_for, MapProvider, MapView};
use crate::search::{SearchError, SearchReport};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<AddressError> for ApiError {
    fn from(e: AddressError) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<ResolutionError> for ApiError {
    fn from(e: ResolutionError) -> Self {
        let status = if e.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::NOT_FOUND
        };
        api_error(status, e.to_string())
    }
}

impl From<SamplingError> for ApiError {
    fn from(e: SamplingError) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Address(e) => e.into(),
            SearchError::Resolution(e) => e.into(),
            SearchError::Sampling(e) => e.into(),
        }
    }
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: state.search.resolver().mode().to_string(),
    })
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddressQuery {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zipCode")]
    pub zip: Option<String>,
}

impl AddressQuery {
    fn to_address(&self) -> Address {
        Address::new(
            self.street.clone().unwrap_or_default(),
            self.city.clone().unwrap_or_default(),
            self.state.clone().unwrap_or_default(),
            self.zip.clone().unwrap_or_default(),
        )
    }
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Json<Coordinate>, ApiError> {
    let start = Instant::now();
    let address = params.to_address();
    address.validate()?;

    let mut rng = state.rng(None);
    let coord = state
        .search
        .resolver()
        .resolve(&address, state.search.credential(), &mut rng)
        .await?;

    info!(
        address = %address,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/geocode"
    );
    Ok(Json(coord))
}

// ─── GET /api/amenities ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct AmenitiesQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub seed: Option<u64>,
}

pub async fn amenities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AmenitiesQuery>,
) -> Result<Json<Vec<Amenity>>, ApiError> {
    let start = Instant::now();
    let (lat, lng) = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Provide 'lat' and 'lng' parameters",
            ))
        }
    };
    let center = Coordinate::new(lat, lng);
    let radius = params.radius.unwrap_or(state.search.radius_km());

    let mut rng = state.rng(params.seed);
    let batch = state
        .search
        .sampler()
        .sample(&center, radius, state.search.credential(), &mut rng)
        .await?;

    info!(
        lat,
        lng,
        radius,
        count = batch.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/amenities"
    );
    Ok(Json(batch))
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zipCode")]
    pub zip: Option<String>,
    pub radius: Option<f64>,
    pub provider: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub report: SearchReport,
    pub headline: String,
    pub map: serde_json::Value,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();

    let provider = match params.provider.as_deref() {
        Some(p) => p
            .parse::<MapProvider>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => state.config.map_provider,
    };

    let address = AddressQuery {
        street: params.street,
        city: params.city,
        state: params.state,
        zip: params.zip,
    }
    .to_address();
    let mut rng = state.rng(params.seed);
    let report = match params.radius {
        Some(r) => state.search.clone().with_radius(r).run(&address, &mut rng).await?,
        None => state.search.run(&address, &mut rng).await?,
    };

    let map = adapter_for(provider).render(&MapView::from_report(&report));

    info!(
        address = %address,
        count = report.amenities.len(),
        %provider,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/search"
    );

    Ok(Json(SearchResponse {
        headline: report.headline(),
        report,
        map,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::build_router;
    use crate::config::{AppConfig, ResolveMode};
    use crate::location::Credential;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn instant_config() -> AppConfig {
        AppConfig {
            geocode_delay_ms: 0,
            places_delay_ms: 0,
            ..AppConfig::default()
        }
    }

    fn live_config(geocoder_url: &str) -> AppConfig {
        AppConfig {
            mode: ResolveMode::Live,
            credential: Credential::new("pk.test"),
            geocoder_url: geocoder_url.to_string(),
            request_timeout_secs: 5,
            ..instant_config()
        }
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        get_with(instant_config(), uri).await
    }

    async fn get_with(config: AppConfig, uri: &str) -> (StatusCode, Value) {
        let response = build_router(config)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "simulated");
    }

    #[tokio::test]
    async fn test_search_ok() {
        let (status, body) = get(
            "/api/search?street=123%20Main%20St&city=New%20York&state=NY&zip=10001&seed=5&provider=google",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let n = body["amenities"].as_array().unwrap().len();
        assert!((9..=21).contains(&n));
        assert_eq!(body["summary"]["total"], n);
        assert_eq!(body["map"]["provider"], "google");
        assert_eq!(body["location"]["formattedAddress"], "123 Main St, New York, NY 10001");
        assert!(body["headline"].as_str().unwrap().ends_with("near 123 Main St"));
    }

    #[tokio::test]
    async fn test_search_seed_is_repeatable() {
        let uri = "/api/search?street=1%20A%20St&city=B&state=CA&zip=90001&seed=9";
        let (_, a) = get(uri).await;
        let (_, b) = get(uri).await;
        assert_eq!(a["amenities"], b["amenities"]);
        assert_eq!(a["location"], b["location"]);
    }

    #[tokio::test]
    async fn test_search_missing_field() {
        let (status, body) = get("/api/search?street=1%20A%20St&city=B&state=CA").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("zip code"));
    }

    #[tokio::test]
    async fn test_search_unknown_provider() {
        let (status, _) =
            get("/api/search?street=1%20A%20St&city=B&state=CA&zip=1&provider=bing").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_amenities_bad_radius() {
        let (status, _) = get("/api/amenities?lat=40&lng=-74&radius=-2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_amenities_requires_coordinates() {
        let (status, _) = get("/api/amenities?lat=40").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_amenities_ok() {
        let (status, body) = get("/api/amenities?lat=40&lng=-74&radius=0.5&seed=3").await;
        assert_eq!(status, StatusCode::OK);
        let n = body.as_array().unwrap().len();
        assert!((9..=21).contains(&n));
    }

    #[tokio::test]
    async fn test_geocode_ok() {
        let (status, body) = get("/api/geocode?street=1%20A%20St&city=B&state=CA&zip=90001").await;
        assert_eq!(status, StatusCode::OK);
        let lat = body["lat"].as_f64().unwrap();
        assert!((-90.0..=90.0).contains(&lat));
    }

    #[tokio::test]
    async fn test_search_no_geocoding_results_is_404() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/geocoding/v5/mapbox\.places/.+\.json$"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": [] })),
            )
            .mount(&upstream)
            .await;

        let (status, body) = get_with(
            live_config(&upstream.uri()),
            "/api/search?street=1%20Nowhere%20Rd&city=B&state=CA&zip=90001",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_search_unreachable_geocoder_is_502() {
        let (status, body) = get_with(
            live_config("http://127.0.0.1:1"),
            "/api/search?street=1%20A%20St&city=B&state=CA&zip=90001",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], 502);
    }

    #[tokio::test]
    async fn test_geocode_upstream_rejects_token_is_502() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&upstream)
            .await;

        let (status, _) = get_with(
            live_config(&upstream.uri()),
            "/api/geocode?street=1%20A%20St&city=B&state=CA&zip=90001",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
