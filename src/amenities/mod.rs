//! Nearby-amenity sampling, summaries and scoring.

pub mod sampler;
pub mod summary;
pub mod types;

pub use sampler::{flat_distance_km, offset_point, scatter, AmenitySampler, KM_PER_DEGREE};
pub use summary::{AmenitySummary, QapScore};
pub use types::{Amenity, Category, SamplingError};
