//! Location subsystem.
//!
//! Turns a structured U.S. address into a single coordinate, either through
//! the Mapbox geocoding API or through a simulated jitter geocoder.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{MapboxGeocoder, SimulatedGeocoder, US_CENTER_LAT, US_CENTER_LNG};
pub use resolver::LocationResolver;
pub use types::{Address, AddressError, Coordinate, Credential, ResolutionError};
