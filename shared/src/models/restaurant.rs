//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::product::Product;

/// Price tier (四档价格区间)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum PriceRange {
    #[serde(rename = "$")]
    #[cfg_attr(feature = "db", sqlx(rename = "$"))]
    Budget,
    #[serde(rename = "$$")]
    #[cfg_attr(feature = "db", sqlx(rename = "$$"))]
    Moderate,
    #[serde(rename = "$$$")]
    #[cfg_attr(feature = "db", sqlx(rename = "$$$"))]
    Upscale,
    #[serde(rename = "$$$$")]
    #[cfg_attr(feature = "db", sqlx(rename = "$$$$"))]
    Luxury,
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub rating: f64,
    pub price_range: PriceRange,
    pub is_active: bool,
    pub opening_year: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
///
/// `slug` is derived from `name` when absent; the first entry of
/// `category_ids` becomes the primary category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub price_range: Option<PriceRange>,
    pub opening_year: Option<i64>,
    pub category_ids: Option<Vec<i64>>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub price_range: Option<PriceRange>,
    pub opening_year: Option<i64>,
    pub is_active: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
}

/// Category as attached to a restaurant response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_primary: bool,
}

/// Main-address excerpt embedded in restaurant listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBrief {
    pub street_address: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
}

impl From<Address> for AddressBrief {
    fn from(a: Address) -> Self {
        Self {
            street_address: a.street_address,
            city: a.city,
            state_province: a.state_province,
            postal_code: a.postal_code,
            country: a.country,
        }
    }
}

/// Restaurant with categories and main address (listing shape)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub categories: Vec<CategoryRef>,
    pub address: Option<AddressBrief>,
}

/// Restaurant with full relations (detail shape)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub categories: Vec<CategoryRef>,
    pub addresses: Vec<Address>,
    /// Ten most recent active products
    pub products: Vec<Product>,
}
