// core/src/pipelines/contexts.rs

//! Underlying data structs for the storefront pipelines. Step handlers
//! receive these wrapped in `ContextData`.

use crate::cart::{Cart, MergePolicy};
use crate::catalog::{CatalogState, ToggleOutcome};
use crate::client::ApiClient;
use crate::flow::ContextData;
use crate::models::{CartLine, CustomerInfo, OrderQuote, Product};
use crate::session::SessionStore;
use std::sync::Arc;

pub struct SigninCtxData {
  pub api: Arc<ApiClient>,
  pub session: Arc<SessionStore>,
  pub email: String,
  pub password: String,
  pub issued_token: Option<String>,
  pub user_email_from_response: Option<String>,
}

pub struct ToggleStatusCtxData {
  pub api: Arc<ApiClient>,
  pub catalog: ContextData<CatalogState>,
  pub product_id: i64,
  /// Cached record found by the first step.
  pub product: Option<Product>,
  /// Set once the edit request succeeded; later failures belong to the reload.
  pub record_sent: bool,
  pub outcome: Option<ToggleOutcome>,
}

pub struct AddToCartCtxData {
  pub api: Arc<ApiClient>,
  pub cart: ContextData<Cart>,
  pub customer: CustomerInfo,
  /// Last-known product record; its price is not re-fetched.
  pub product: Product,
  pub quantity: u32,
  pub policy: MergePolicy,
  /// Quantity sent to the pricing authority (combined under `Reprice`).
  pub priced_quantity: Option<u32>,
  pub quote: Option<OrderQuote>,
  pub line: Option<CartLine>,
  pub merged_line: Option<CartLine>,
}
