//! The offer record scraped deals are stored as.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One promotional deal.
///
/// Every field is optional: scrapers fill in what the page exposes and
/// leave the rest as `None`. Missing JSON keys and explicit `null`s both
/// deserialize to `None`; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Headline of the deal.
    #[serde(default)]
    pub title: Option<String>,

    /// Longer description of the deal.
    #[serde(default)]
    pub description: Option<String>,

    /// ISO-8601 date or date-time. `None` means no known expiry.
    #[serde(default)]
    pub expiry_date: Option<String>,

    /// Brand or store running the deal.
    #[serde(default)]
    pub brand_name: Option<String>,

    /// Landing page for the deal.
    #[serde(default)]
    pub offer_link: Option<String>,

    /// Product category.
    #[serde(default)]
    pub category: Option<String>,

    /// Campaign the deal belongs to.
    #[serde(default)]
    pub campaign_info: Option<String>,

    /// Channels the deal is valid on (app, web, stores).
    #[serde(default)]
    pub channels: Option<String>,
}

impl OfferRecord {
    /// Create an offer with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand_name = Some(brand.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the expiry date.
    pub fn with_expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry_date = Some(expiry.into());
        self
    }

    /// Set the offer link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.offer_link = Some(link.into());
        self
    }

    /// Text submitted to the embedding service for this offer.
    ///
    /// Missing fields render as empty strings, a missing expiry as `N/A`.
    pub fn embedding_text(&self) -> String {
        format!(
            "Title: {}. Description: {}. Brand: {}. Category: {}. Expiry: {}.",
            self.title.as_deref().unwrap_or(""),
            self.description.as_deref().unwrap_or(""),
            self.brand_name.as_deref().unwrap_or(""),
            self.category.as_deref().unwrap_or(""),
            self.expiry_date.as_deref().unwrap_or("N/A"),
        )
    }

    /// Case-insensitive exact comparison against the brand name.
    pub fn brand_is(&self, brand: &str) -> bool {
        self.brand_name
            .as_deref()
            .map_or(false, |b| b.to_lowercase() == brand.to_lowercase())
    }

    /// Case-insensitive substring check against the brand name.
    pub fn brand_contains(&self, needle: &str) -> bool {
        self.brand_name
            .as_deref()
            .map_or(false, |b| b.to_lowercase().contains(&needle.to_lowercase()))
    }

    /// Parse the expiry date, accepting RFC 3339 date-times and bare dates.
    ///
    /// A bare date expires at the end of that day (UTC).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expiry_date.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
    }

    /// Whether the offer has a parseable expiry before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(false, |exp| exp < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_embedding_text_full() {
        let offer = OfferRecord::new("Flat 50% Off")
            .with_description("On makeup")
            .with_brand("Nykaa")
            .with_category("Beauty")
            .with_expiry("2025-06-30");

        assert_eq!(
            offer.embedding_text(),
            "Title: Flat 50% Off. Description: On makeup. Brand: Nykaa. Category: Beauty. Expiry: 2025-06-30."
        );
    }

    #[test]
    fn test_embedding_text_missing_fields() {
        let offer = OfferRecord::default();
        assert_eq!(
            offer.embedding_text(),
            "Title: . Description: . Brand: . Category: . Expiry: N/A."
        );
    }

    #[test]
    fn test_deserialize_nulls_and_missing_keys() {
        let offer: OfferRecord = serde_json::from_str(
            r#"{"title": "Sale", "expiry_date": null, "extra_field": 3}"#,
        )
        .unwrap();

        assert_eq!(offer.title.as_deref(), Some("Sale"));
        assert!(offer.expiry_date.is_none());
        assert!(offer.brand_name.is_none());
    }

    #[test]
    fn test_brand_matching() {
        let offer = OfferRecord::new("x").with_brand("FlipKart");
        assert!(offer.brand_is("flipkart"));
        assert!(offer.brand_is("FLIPKART"));
        assert!(!offer.brand_is("flip"));
        assert!(offer.brand_contains("flip"));
        assert!(!OfferRecord::default().brand_is(""));
    }

    #[test]
    fn test_expiry_parsing() {
        let date_only = OfferRecord::new("a").with_expiry("2025-06-30");
        assert_eq!(
            date_only.expires_at(),
            Some(Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap())
        );

        let rfc = OfferRecord::new("b").with_expiry("2025-06-30T10:00:00+05:30");
        assert_eq!(
            rfc.expires_at(),
            Some(Utc.with_ymd_and_hms(2025, 6, 30, 4, 30, 0).unwrap())
        );

        let naive = OfferRecord::new("c").with_expiry("2025-06-30T10:00:00");
        assert!(naive.expires_at().is_some());

        assert!(OfferRecord::new("d").with_expiry("soon").expires_at().is_none());
        assert!(OfferRecord::new("e").expires_at().is_none());
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        assert!(OfferRecord::new("old").with_expiry("2025-06-30").is_expired_at(now));
        assert!(!OfferRecord::new("new").with_expiry("2025-07-31").is_expired_at(now));
        assert!(!OfferRecord::new("open").is_expired_at(now));
    }
}
