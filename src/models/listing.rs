use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product offer extracted from one site for one search term.
///
/// Field names are the JSON snapshot shape consumed by report writers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub name: String,
    /// Zero means the site's price text could not be read.
    pub price: Decimal,
    pub price_display: String,
    pub source_site: String,
    pub link: Option<String>,
    pub image: Option<String>,
    pub retrieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub price: Decimal,
    pub price_display: String,
    pub source_site: String,
    pub link: Option<String>,
    pub image: Option<String>,
    pub retrieved_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(new_listing: NewListing) -> Self {
        Self {
            name: new_listing.name.trim().to_string(),
            price: new_listing.price.max(Decimal::ZERO),
            price_display: new_listing.price_display,
            source_site: new_listing.source_site,
            link: new_listing.link.filter(|l| !l.trim().is_empty()),
            image: new_listing.image.filter(|i| !i.trim().is_empty()),
            retrieved_at: new_listing.retrieved_at,
        }
    }

    pub fn is_unpriced(&self) -> bool {
        self.price.is_zero()
    }
}
