// core/src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i64,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub weight: Decimal,
  #[serde(default)]
  pub image: Option<String>,
  pub is_enabled: bool,
}

impl Product {
  /// Checks the invariants a record must satisfy before it enters the catalog.
  pub fn validate(&self) -> Result<(), String> {
    if self.price < Decimal::ZERO {
      return Err(format!("product {} has a negative price ({})", self.id, self.price));
    }
    if self.weight < Decimal::ZERO {
      return Err(format!("product {} has a negative weight ({})", self.id, self.weight));
    }
    Ok(())
  }

  /// The full record as sent to `PUT /editproduct/{id}`, with `isEnabled` inverted.
  pub fn status_flipped(&self) -> ProductUpdate<'_> {
    ProductUpdate {
      name: &self.name,
      description: &self.description,
      price: self.price,
      weight: self.weight,
      image: self.image.as_deref(),
      is_enabled: !self.is_enabled,
    }
  }
}

/// Body of an edit request. The id travels in the path, not the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate<'a> {
  pub name: &'a str,
  pub description: &'a str,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub weight: Decimal,
  pub image: Option<&'a str>,
  pub is_enabled: bool,
}

/// `GET /products` response. A missing list is read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsEnvelope {
  #[serde(default)]
  pub products: Vec<Product>,
}
