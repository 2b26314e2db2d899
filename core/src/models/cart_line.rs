// core/src/models/cart_line.rs

use crate::models::product::Product;
use rust_decimal::Decimal;
use serde::Serialize;

/// One aggregated entry per product in the in-memory cart.
///
/// `name` and `price` are snapshots taken when the line was priced; the
/// discount is whatever the pricing authority returned and is never derived
/// locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: u32,
  pub discount: Decimal,
  pub total: Decimal,
}

impl CartLine {
  /// Builds a line for `quantity` units: `total = price × quantity − discount`.
  pub fn priced(product: &Product, quantity: u32, discount: Decimal) -> Self {
    Self {
      product_id: product.id,
      name: product.name.clone(),
      price: product.price,
      quantity,
      discount,
      total: product.price * Decimal::from(quantity) - discount,
    }
  }
}
