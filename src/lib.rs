//! Amenity Finder: geocode a U.S. address, sample nearby hospitals, schools
//! and transport, and describe the result for a map front end.

pub mod amenities;
pub mod config;
pub mod location;
pub mod render;
pub mod search;
pub mod server;
