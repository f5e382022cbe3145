use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of amenity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hospital,
    School,
    Transport,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Hospital, Self::School, Self::Transport];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Transport => "transport",
        }
    }

    /// Plural heading used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hospital => "Hospitals",
            Self::School => "Schools",
            Self::Transport => "Transport",
        }
    }

    /// Template names the simulated sampler draws from.
    pub fn name_templates(&self) -> &'static [&'static str; 5] {
        match self {
            Self::Hospital => &[
                "General Hospital",
                "Medical Center",
                "Emergency Care",
                "Health Clinic",
                "Family Medicine",
            ],
            Self::School => &[
                "Elementary School",
                "High School",
                "Middle School",
                "Academy",
                "Learning Center",
            ],
            Self::Transport => &[
                "Bus Station",
                "Metro Station",
                "Train Stop",
                "Transit Center",
                "Bus Terminal",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hospital" => Ok(Self::Hospital),
            "school" => Ok(Self::School),
            "transport" => Ok(Self::Transport),
            other => Err(format!("Unknown category '{}'", other)),
        }
    }
}

/// A point of interest. Ids are only unique within one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("Search radius must be a non-negative number of kilometers, got {0}")]
    InvalidRadius(f64),
    #[error("Search center is not a valid coordinate: {lat}, {lng}")]
    InvalidCenter { lat: f64, lng: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Transport).unwrap();
        assert_eq!(json, "\"transport\"");
        let back: Category = serde_json::from_str("\"school\"").unwrap();
        assert_eq!(back, Category::School);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Hospital".parse::<Category>().unwrap(), Category::Hospital);
        assert!("park".parse::<Category>().is_err());
    }

    #[test]
    fn test_amenity_json_shape() {
        let a = Amenity {
            id: "school-0".into(),
            name: "Academy 3".into(),
            category: Category::School,
            lat: 1.5,
            lng: -2.5,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["id"], "school-0");
        assert_eq!(v["category"], "school");
        assert_eq!(v["lng"], -2.5);
    }
}
