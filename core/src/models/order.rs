// core/src/models/order.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /create/order`, used as a pricing request for one cart addition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
  pub customer_info: CustomerInfo,
  pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerInfo {
  pub name: String,
  pub email: String,
  pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
  pub product_id: i64,
  pub quantity: u32,
}

/// The pricing authority's answer. Only the discount is consumed; any other
/// field in the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderQuote {
  #[serde(with = "rust_decimal::serde::float")]
  pub discount: Decimal,
}

impl OrderQuote {
  pub fn validate(&self) -> Result<(), String> {
    if self.discount < Decimal::ZERO {
      return Err(format!("negative discount ({})", self.discount));
    }
    Ok(())
  }
}
