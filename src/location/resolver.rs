//! Location resolver: one entry point over the live and simulated geocoders.
//!
//! Live flow:       address → Mapbox forward geocode → first candidate
//! Simulated flow:  address → delay → jittered continental center

use std::time::Duration;

use rand::Rng;
use tracing::info;

use super::providers::{MapboxGeocoder, SimulatedGeocoder};
use super::types::{Address, Coordinate, Credential, ResolutionError};
use crate::config::{AppConfig, ResolveMode};

/// Turns a postal address into a coordinate. Both strategies share one
/// contract, so callers never branch on the mode.
#[derive(Debug, Clone)]
pub enum LocationResolver {
    Live(MapboxGeocoder),
    Simulated(SimulatedGeocoder),
}

impl LocationResolver {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.mode {
            ResolveMode::Live => Self::Live(MapboxGeocoder::new(
                config.geocoder_url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )),
            ResolveMode::Simulated => Self::Simulated(SimulatedGeocoder::new(
                Duration::from_millis(config.geocode_delay_ms),
            )),
        }
    }

    /// A simulated resolver with no artificial delay (tests, offline demos).
    pub fn instant() -> Self {
        Self::Simulated(SimulatedGeocoder::new(Duration::ZERO))
    }

    pub fn mode(&self) -> ResolveMode {
        match self {
            Self::Live(_) => ResolveMode::Live,
            Self::Simulated(_) => ResolveMode::Simulated,
        }
    }

    /// Resolve an address. The address is expected to be validated already.
    pub async fn resolve<R>(
        &self,
        address: &Address,
        credential: &Credential,
        rng: &mut R,
    ) -> Result<Coordinate, ResolutionError>
    where
        R: Rng + Send + ?Sized,
    {
        let coord = match self {
            Self::Live(geocoder) => geocoder.geocode(address, credential).await?,
            Self::Simulated(geocoder) => geocoder.geocode(address, rng).await?,
        };

        info!(
            mode = %self.mode(),
            lat = coord.lat,
            lng = coord.lng,
            "Resolved address"
        );
        Ok(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn nyc() -> Address {
        Address::new("123 Main St", "New York", "NY", "10001")
    }

    #[tokio::test]
    async fn test_simulated_resolve_in_range() {
        let resolver = LocationResolver::instant();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let c = resolver.resolve(&nyc(), &Credential::none(), &mut rng).await.unwrap();
            assert!((-90.0..=90.0).contains(&c.lat));
            assert!((-180.0..=180.0).contains(&c.lng));
            assert!(!c.formatted_address.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_simulated_ignores_credential() {
        let resolver = LocationResolver::instant();
        let a = resolver
            .resolve(&nyc(), &Credential::none(), &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();
        let b = resolver
            .resolve(&nyc(), &Credential::new("pk.x"), &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_live_unreachable_is_resolution_error() {
        let config = AppConfig {
            mode: ResolveMode::Live,
            geocoder_url: "http://127.0.0.1:1".into(),
            credential: Credential::new("t"),
            ..AppConfig::default()
        };
        let resolver = LocationResolver::from_config(&config);
        assert_eq!(resolver.mode(), ResolveMode::Live);

        let mut rng = StdRng::seed_from_u64(0);
        let err = resolver
            .resolve(&nyc(), &config.credential, &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Unreachable(_)));
    }

    #[test]
    fn test_from_config_simulated_by_default() {
        let resolver = LocationResolver::from_config(&AppConfig::default());
        assert_eq!(resolver.mode(), ResolveMode::Simulated);
    }
}
