//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A U.S. postal address as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode", alias = "zip_code", alias = "zip")]
    pub zip_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
        }
    }

    /// Check that every field carries something other than whitespace.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }

    /// "123 Main St, New York, NY 10001"
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.street.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.one_line())
    }
}

/// A resolved geographic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    #[serde(
        rename = "formattedAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub formatted_address: Option<String>,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            formatted_address: None,
        }
    }

    pub fn with_address(mut self, formatted: impl Into<String>) -> Self {
        self.formatted_address = Some(formatted.into());
        self
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Opaque provider token. Never printed in full.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            Self(None)
        } else {
            Self(Some(token.to_string()))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "Credential(***)"),
            None => write!(f, "Credential(none)"),
        }
    }
}

impl From<Option<String>> for Credential {
    fn from(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

/// Rejected before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Missing information: please fill out the {0} field")]
    MissingField(&'static str),
}

/// Address could not be turned into a coordinate.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Geocoding requires an access token; set AMENITY_TOKEN or pass --token")]
    MissingCredential,
    #[error("Failed to geocode address: {0}")]
    Unreachable(String),
    #[error("Failed to geocode address: service returned status {0}")]
    Status(u16),
    #[error("Invalid geocoding response: {0}")]
    InvalidResponse(String),
    #[error("No results found for this address: '{0}'")]
    NoResults(String),
}

impl ResolutionError {
    /// True when the failure originated upstream rather than in the query.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::NoResults(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_address() -> Address {
        Address::new("123 Main St", "New York", "NY", "10001")
    }

    #[test]
    fn test_one_line() {
        assert_eq!(sample_address().one_line(), "123 Main St, New York, NY 10001");
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_address().validate().is_ok());
    }

    #[test]
    fn test_validate_blank_field() {
        let mut addr = sample_address();
        addr.state = "   ".into();
        assert_eq!(addr.validate(), Err(AddressError::MissingField("state")));
    }

    #[test]
    fn test_validate_reports_first_missing() {
        let addr = Address::new("", "", "NY", "");
        assert_eq!(addr.validate(), Err(AddressError::MissingField("street")));
    }

    #[test]
    fn test_address_json_shape() {
        let json = serde_json::to_value(sample_address()).unwrap();
        assert_eq!(json["zipCode"], "10001");
        let back: Address = serde_json::from_str(
            r#"{"street":"1 A St","city":"B","state":"CA","zip":"90001"}"#,
        )
        .unwrap();
        assert_eq!(back.zip_code, "90001");
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coordinate_skips_missing_address() {
        let json = serde_json::to_string(&Coordinate::new(1.0, 2.0)).unwrap();
        assert!(!json.contains("formattedAddress"));
    }

    #[test]
    fn test_credential_redacted() {
        let c = Credential::new("pk.secret");
        assert_eq!(format!("{:?}", c), "Credential(***)");
        assert_eq!(c.as_deref(), Some("pk.secret"));
        assert!(!Credential::new("  ").is_present());
    }

    #[test]
    fn test_credential_trims_whitespace() {
        let c = Credential::new(" pk.secret\n");
        assert_eq!(c.as_deref(), Some("pk.secret"));
        let from_env: Credential = Some("pk.env\r\n".to_string()).into();
        assert_eq!(from_env.as_deref(), Some("pk.env"));
    }

    #[test]
    fn test_no_results_not_upstream() {
        assert!(!ResolutionError::NoResults("x".into()).is_upstream());
        assert!(ResolutionError::Status(500).is_upstream());
    }
}
