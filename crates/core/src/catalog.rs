//! Catalog types: products, categories and the product listing query.
//!
//! JSON field names are camelCase to match what the web front end sends and
//! expects. Product types travel as PascalCase tokens (`"Bouquet"`).

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};
use crate::validation::{self, ValidationError};

/// Column widths of the catalog tables.
pub const PRODUCT_NAME_MAX: usize = 128;
pub const DESCRIPTION_MAX: usize = 2048;
pub const CATEGORY_NAME_MAX: usize = 64;

// =============================================================================
// Product type
// =============================================================================

/// What kind of item a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductType {
    #[default]
    Flower,
    Bouquet,
    Composition,
}

impl ProductType {
    pub const ALL: [Self; 3] = [Self::Flower, Self::Bouquet, Self::Composition];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flower => "Flower",
            Self::Bouquet => "Bouquet",
            Self::Composition => "Composition",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so `bouquet` and `BOUQUET` both parse.
impl FromStr for ProductType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "product type",
                value: s.to_owned(),
            })
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /api/categories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A category request that passed validation; ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl NewCategory {
    /// Trim fields, derive the slug from the name when absent, and check limits.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is blank, too long, or
    /// yields an empty slug.
    pub fn validate(&self) -> Result<ValidCategory, ValidationError> {
        let name = validation::required("Category name", &self.name)?;
        validation::max_len("Category name", name, CATEGORY_NAME_MAX)?;

        let description = validation::optional(self.description.as_deref());
        if let Some(description) = &description {
            validation::max_len("Description", description, DESCRIPTION_MAX)?;
        }

        let slug = slugify(self.slug.as_deref().unwrap_or(name));
        if slug.is_empty() {
            return Err(ValidationError::Required("Category slug"));
        }
        validation::max_len("Category slug", &slug, CATEGORY_NAME_MAX)?;

        Ok(ValidCategory {
            name: name.to_owned(),
            slug,
            description,
        })
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
///
/// `"Mixed Bouquets"` becomes `"mixed-bouquets"`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item as returned by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(alias = "stockQty")]
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "type", default)]
    pub product_type: ProductType,
}

/// Body of `POST /api/products` (the admin entry form).
///
/// Price and stock are kept loose here so that out-of-range values produce a
/// validation message instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "type", default)]
    pub product_type: ProductType,
}

/// A product request that passed validation.
///
/// Whether `category_id` exists is checked by the storefront at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub stock_quantity: u32,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub product_type: ProductType,
}

impl NewProduct {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank or overlong name, a price
    /// that is not strictly positive, a negative stock quantity, or a missing
    /// category.
    pub fn validate(&self) -> Result<ValidProduct, ValidationError> {
        let name = validation::required("Product name", &self.name)?;
        validation::max_len("Product name", name, PRODUCT_NAME_MAX)?;

        if self.price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }
        let price = Price::new(self.price).map_err(|_| ValidationError::NonPositivePrice)?;

        if self.stock_quantity < 0 {
            return Err(ValidationError::NegativeStock);
        }
        let stock_quantity = i32::try_from(self.stock_quantity)
            .ok()
            .and_then(|q| u32::try_from(q).ok())
            .ok_or(ValidationError::StockTooLarge)?;

        let category_id = self.category_id.ok_or(ValidationError::Required("Category"))?;

        let description = validation::optional(self.description.as_deref());
        if let Some(description) = &description {
            validation::max_len("Description", description, DESCRIPTION_MAX)?;
        }

        Ok(ValidProduct {
            name: name.to_owned(),
            description,
            price,
            stock_quantity,
            image_url: validation::optional(self.image_url.as_deref()),
            category_id,
            product_type: self.product_type,
        })
    }
}

// =============================================================================
// Listing query
// =============================================================================

/// Ordering of a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    PriceAscending,
    PriceDescending,
    Name,
    /// Ascending product id.
    #[default]
    Default,
}

impl SortKey {
    /// Map a query-string token to a sort key; unknown tokens mean `Default`.
    ///
    /// The long spellings `price_ascending` and `price_descending` are
    /// accepted too.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "price_asc" | "price_ascending" => Self::PriceAscending,
            "price_desc" | "price_descending" => Self::PriceDescending,
            "name" => Self::Name,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::PriceAscending => "price_asc",
            Self::PriceDescending => "price_desc",
            Self::Name => "name",
            Self::Default => "default",
        }
    }
}

/// Filters for `GET /api/products`. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Substring of the name or description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Category slug or exact name.
    pub category: Option<String>,
    pub product_type: Option<ProductType>,
    pub sort: SortKey,
}

impl ProductQuery {
    /// Search text with surrounding whitespace removed; blank means no search.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Query-string pairs as understood by the storefront API.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search_term() {
            pairs.push(("search", search.to_owned()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("category", category.to_owned()));
        }
        if let Some(product_type) = self.product_type {
            pairs.push(("type", product_type.as_str().to_owned()));
        }
        if self.sort != SortKey::Default {
            pairs.push(("sort", self.sort.token().to_owned()));
        }
        pairs
    }
}
