//! Cafe records as the remote catalog API sees them.
//!
//! The API owns these records; the site only (de)serializes them. Field names
//! here are part of the API contract and must not be renamed.

use serde::{Deserialize, Serialize};

use cafe_catalog_core::CafeId;

/// A cafe as returned by `GET /all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub seats: String,
    #[serde(default)]
    pub has_toilet: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_sockets: bool,
    #[serde(default)]
    pub can_take_calls: bool,
    #[serde(default)]
    pub coffee_price: Option<String>,
}

/// Body of `GET /all`.
///
/// Deployed versions of the API answer with either a bare array or an object
/// wrapping it under `cafes`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CafeList {
    Bare(Vec<Cafe>),
    Wrapped { cafes: Vec<Cafe> },
}

impl Cafe {
    /// Price for display; the API leaves it null for some cafes.
    #[must_use]
    pub fn price_label(&self) -> &str {
        self.coffee_price.as_deref().unwrap_or("?")
    }
}

impl CafeList {
    #[must_use]
    pub fn into_vec(self) -> Vec<Cafe> {
        match self {
            Self::Bare(cafes) | Self::Wrapped { cafes } => cafes,
        }
    }
}

/// Yes/no amenity flag.
///
/// The add endpoint parses these from the literal strings `True` and `False`,
/// which is also what the form's select inputs submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Amenity {
    #[serde(rename = "True")]
    #[default]
    Yes,
    #[serde(rename = "False")]
    No,
}

impl Amenity {
    /// Wire/form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "True",
            Self::No => "False",
        }
    }

    /// Parse a submitted select value; anything but `True`/`False` is rejected.
    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        match value {
            "True" => Some(Self::Yes),
            "False" => Some(Self::No),
            _ => None,
        }
    }
}

/// Form-encoded body of `POST /add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: Amenity,
    pub has_wifi: Amenity,
    pub has_sockets: Amenity,
    pub can_take_calls: Amenity,
    pub coffee_price: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 1,
        "name": "Science Gallery London",
        "map_url": "https://g.page/scigallerylon",
        "img_url": "https://example.org/sgl.jpg",
        "location": "London Bridge",
        "seats": "50+",
        "has_toilet": true,
        "has_wifi": false,
        "has_sockets": true,
        "can_take_calls": true,
        "coffee_price": "£2.40"
    }"#;

    #[test]
    fn test_bare_list() {
        let body = format!("[{SAMPLE}]");
        let cafes = serde_json::from_str::<CafeList>(&body).unwrap().into_vec();

        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0].id, CafeId::new(1));
        assert!(cafes[0].has_toilet);
        assert!(!cafes[0].has_wifi);
        assert_eq!(cafes[0].coffee_price.as_deref(), Some("£2.40"));
    }

    #[test]
    fn test_wrapped_list() {
        let body = format!(r#"{{"cafes": [{SAMPLE}, {SAMPLE}]}}"#);
        let cafes = serde_json::from_str::<CafeList>(&body).unwrap().into_vec();
        assert_eq!(cafes.len(), 2);
    }

    #[test]
    fn test_missing_optional_fields() {
        let cafes = serde_json::from_str::<CafeList>(r#"[{"id": 3, "name": "Tiny"}]"#)
            .unwrap()
            .into_vec();

        assert_eq!(cafes[0].seats, "");
        assert_eq!(cafes[0].coffee_price, None);
        assert!(!cafes[0].can_take_calls);
    }

    #[test]
    fn test_amenity_wire_values() {
        assert_eq!(Amenity::Yes.as_str(), "True");
        assert_eq!(serde_json::to_string(&Amenity::No).unwrap(), "\"False\"");
        let parsed: Amenity = serde_json::from_str("\"True\"").unwrap();
        assert_eq!(parsed, Amenity::Yes);

        assert_eq!(Amenity::from_form("False"), Some(Amenity::No));
        assert_eq!(Amenity::from_form("yes"), None);
        assert_eq!(Amenity::from_form(""), None);
    }
}
