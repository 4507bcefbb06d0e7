//! Album records
//!
//! Field names on the wire are camelCase; the frontend consumes these
//! structs verbatim as JSON.

use serde::{Deserialize, Serialize};

/// A releasable or upcoming album in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Store-assigned id, monotonically increasing from 1
    pub id: i64,
    pub title: String,
    /// Label / catalog code (e.g. "CEAZY")
    pub catalog: String,
    pub cover_image: String,
    /// Kept even for unreleased albums to drive the countdown display
    pub release_date: Option<String>,
    /// Decimal string (e.g. "5.00"); None until the album is released
    pub price: Option<String>,
    pub is_released: bool,
    pub preview_url: Option<String>,
    pub purchase_url: Option<String>,
}

/// Insert form of [`Album`]: everything but the id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    pub title: String,
    pub catalog: String,
    pub cover_image: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub is_released: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub purchase_url: Option<String>,
}

impl Album {
    /// Price converted to the payment processor's minor-unit integer
    /// representation ("5.00" → 500, rounded).
    ///
    /// Returns None when the album has no price or the price string does
    /// not parse as a non-negative decimal.
    pub fn price_in_minor_units(&self) -> Option<i64> {
        let value: f64 = self.price.as_deref()?.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some((value * 100.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_with_price(price: Option<&str>) -> Album {
        Album {
            id: 1,
            title: "EVOLUTION".to_string(),
            catalog: "CEAZY".to_string(),
            cover_image: "/src/assets/EVOLUTION.png".to_string(),
            release_date: Some("2024-12-01".to_string()),
            price: price.map(str::to_string),
            is_released: true,
            preview_url: None,
            purchase_url: None,
        }
    }

    #[test]
    fn minor_units_rounds_decimal_prices() {
        assert_eq!(album_with_price(Some("5.00")).price_in_minor_units(), Some(500));
        assert_eq!(album_with_price(Some("4.99")).price_in_minor_units(), Some(499));
        assert_eq!(album_with_price(Some("0.1")).price_in_minor_units(), Some(10));
        assert_eq!(album_with_price(Some("12")).price_in_minor_units(), Some(1200));
    }

    #[test]
    fn minor_units_rejects_missing_or_garbage_prices() {
        assert_eq!(album_with_price(None).price_in_minor_units(), None);
        assert_eq!(album_with_price(Some("free")).price_in_minor_units(), None);
        assert_eq!(album_with_price(Some("-1.00")).price_in_minor_units(), None);
        assert_eq!(album_with_price(Some("")).price_in_minor_units(), None);
    }

    #[test]
    fn album_serializes_with_camel_case_wire_names() {
        let value = serde_json::to_value(album_with_price(Some("5.00"))).unwrap();
        assert_eq!(value["coverImage"], "/src/assets/EVOLUTION.png");
        assert_eq!(value["releaseDate"], "2024-12-01");
        assert_eq!(value["isReleased"], true);
        assert_eq!(value["price"], "5.00");
        assert!(value["previewUrl"].is_null());
        assert!(value["purchaseUrl"].is_null());
    }
}
