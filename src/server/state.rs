use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AppConfig;
use crate::search::Search;

pub struct AppState {
    pub config: AppConfig,
    pub search: Search,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let search = Search::from_config(&config);
        Self { config, search }
    }

    /// Request seed, else the configured seed, else OS entropy.
    pub fn rng(&self, seed: Option<u64>) -> StdRng {
        match seed.or(self.config.seed) {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        }
    }
}
