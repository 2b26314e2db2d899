// core/src/cart.rs

//! The in-memory cart accumulator and the per-product operation queue that
//! serializes additions of the same product.

use crate::error::{StoreError, StoreResult};
use crate::models::CartLine;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// How a new addition is folded into an existing line for the same product.
///
/// Quantities always add up. The policies differ only in which pricing the
/// merged line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
  /// Discount and total come from the latest addition alone, so the total
  /// covers only the units added last.
  #[default]
  LatestPricing,
  /// Discount and total stay as priced by the earlier addition.
  KeepFirstPricing,
  /// The pricing authority is asked again for the combined quantity and the
  /// line is rebuilt from that quote.
  Reprice,
}

impl MergePolicy {
  pub fn as_str(&self) -> &'static str {
    match self {
      MergePolicy::LatestPricing => "latest",
      MergePolicy::KeepFirstPricing => "keep-first",
      MergePolicy::Reprice => "reprice",
    }
  }
}

impl fmt::Display for MergePolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MergePolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "latest" | "latest-pricing" => Ok(MergePolicy::LatestPricing),
      "keep-first" | "keep-first-pricing" => Ok(MergePolicy::KeepFirstPricing),
      "reprice" => Ok(MergePolicy::Reprice),
      other => Err(format!(
        "unknown merge policy '{other}' (expected latest, keep-first or reprice)"
      )),
    }
  }
}

pub const QUANTITY_TOO_LARGE_MESSAGE: &str = "Combined quantity is too large.";

/// Adds a new quantity to the one already in the cart, rejecting overflow.
pub fn combined_quantity(in_cart: u32, added: u32) -> StoreResult<u32> {
  in_cart
    .checked_add(added)
    .ok_or_else(|| StoreError::Validation(QUANTITY_TOO_LARGE_MESSAGE.to_string()))
}

/// Ordered cart lines, at most one per product id, in first-added order.
///
/// The cart only grows: there is no removal or checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn line(&self, product_id: i64) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  /// Sum of quantities over all lines.
  pub fn item_count(&self) -> u64 {
    self.lines.iter().map(|l| u64::from(l.quantity)).sum()
  }

  /// Sum of line totals.
  pub fn grand_total(&self) -> Decimal {
    self.lines.iter().map(|l| l.total).sum()
  }

  /// Folds `incoming` into the cart and returns the resulting line.
  ///
  /// Under [`MergePolicy::Reprice`], `incoming` must already be priced for
  /// the combined quantity and replaces the existing line outright. A
  /// combined quantity past `u32::MAX` is rejected and the cart is left as is.
  pub fn merge(&mut self, incoming: CartLine, policy: MergePolicy) -> StoreResult<CartLine> {
    let Some(idx) = self.lines.iter().position(|l| l.product_id == incoming.product_id) else {
      self.lines.push(incoming.clone());
      return Ok(incoming);
    };
    let existing = &mut self.lines[idx];

    match policy {
      MergePolicy::LatestPricing => {
        existing.quantity = combined_quantity(existing.quantity, incoming.quantity)?;
        existing.name = incoming.name;
        existing.price = incoming.price;
        existing.discount = incoming.discount;
        existing.total = incoming.total;
      }
      MergePolicy::KeepFirstPricing => {
        existing.quantity = combined_quantity(existing.quantity, incoming.quantity)?;
      }
      MergePolicy::Reprice => {
        *existing = incoming;
      }
    }
    Ok(existing.clone())
  }
}

/// One async lock per product id. Holding a product's guard for the whole
/// add-to-cart run makes same-product additions apply in start order.
#[derive(Debug, Default)]
pub struct ProductQueues {
  queues: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProductQueues {
  /// Waits for this product's turn.
  pub async fn acquire(&self, product_id: i64) -> OwnedMutexGuard<()> {
    let queue = {
      let mut queues = self.queues.lock();
      Arc::clone(queues.entry(product_id).or_default())
    };
    queue.lock_owned().await
  }
}
