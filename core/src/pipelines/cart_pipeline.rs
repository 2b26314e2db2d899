// core/src/pipelines/cart_pipeline.rs

use crate::cart::{self, MergePolicy};
use crate::error::{StoreError, StoreResult};
use crate::flow::{ContextData, Pipeline, PipelineControl};
use crate::models::{CartLine, OrderItemRequest, OrderRequest};
use crate::pipelines::contexts::AddToCartCtxData;
use tracing::{debug, info, warn};

pub fn build_add_to_cart_pipeline() -> StoreResult<Pipeline<AddToCartCtxData>> {
  let mut p = Pipeline::<AddToCartCtxData>::new(
    "add_to_cart",
    &[
      ("validate_cart_input", false),
      ("request_pricing", false),
      ("build_cart_line", false),
      ("merge_cart_line", false),
    ],
  );

  p.on_root("validate_cart_input", validate_cart_input)?;
  p.on_root("request_pricing", request_pricing)?;
  p.on_root("build_cart_line", build_cart_line)?;
  p.on_root("merge_cart_line", merge_cart_line)?;
  Ok(p)
}

// Step 1: positive quantity, enabled product. The presentation layer already
// hides disabled products; this is a second check, not a server-side one.
async fn validate_cart_input(ctx_data: ContextData<AddToCartCtxData>) -> StoreResult<PipelineControl> {
  let (quantity, product_id, is_enabled) = {
    let guard = ctx_data.read();
    (guard.quantity, guard.product.id, guard.product.is_enabled)
  };

  if quantity == 0 {
    warn!(product_id, "Add to cart rejected: quantity must be at least 1.");
    return Err(StoreError::Validation("Quantity must be at least 1.".to_string()));
  }
  if !is_enabled {
    warn!(product_id, "Add to cart rejected: product is disabled.");
    return Err(StoreError::ProductDisabled { product_id });
  }
  Ok(PipelineControl::Continue)
}

// Step 2: the pricing authority is the only source of the discount.
async fn request_pricing(ctx_data: ContextData<AddToCartCtxData>) -> StoreResult<PipelineControl> {
  let (api, customer, product_id, priced_quantity) = {
    let guard = ctx_data.read();
    let already_in_cart = match guard.policy {
      MergePolicy::Reprice => guard.cart.read().line(guard.product.id).map_or(0, |l| l.quantity),
      MergePolicy::LatestPricing | MergePolicy::KeepFirstPricing => 0,
    };
    (
      guard.api.clone(),
      guard.customer.clone(),
      guard.product.id,
      cart::combined_quantity(already_in_cart, guard.quantity),
    )
  };
  let priced_quantity = priced_quantity?;

  let request = OrderRequest {
    customer_info: customer,
    items: vec![OrderItemRequest {
      product_id,
      quantity: priced_quantity,
    }],
  };
  debug!(product_id, quantity = priced_quantity, "Requesting pricing.");
  let quote = api.create_order(&request).await?;
  info!(product_id, quantity = priced_quantity, discount = %quote.discount, "Pricing received.");

  {
    let mut guard = ctx_data.write();
    guard.priced_quantity = Some(priced_quantity);
    guard.quote = Some(quote);
  }
  Ok(PipelineControl::Continue)
}

// Step 3: total = last-known price × priced quantity − returned discount.
async fn build_cart_line(ctx_data: ContextData<AddToCartCtxData>) -> StoreResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let (Some(priced_quantity), Some(quote)) = (guard.priced_quantity, guard.quote.as_ref()) else {
    return Err(StoreError::Internal("cart line requested before pricing".to_string()));
  };
  let line = CartLine::priced(&guard.product, priced_quantity, quote.discount);
  guard.line = Some(line);
  Ok(PipelineControl::Continue)
}

// Step 4: the only step that touches the cart, so a failure anywhere earlier
// leaves it unchanged.
async fn merge_cart_line(ctx_data: ContextData<AddToCartCtxData>) -> StoreResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let Some(line) = guard.line.take() else {
    return Err(StoreError::Internal("no cart line to merge".to_string()));
  };
  let merged = guard.cart.write().merge(line, guard.policy)?;
  info!(
    product_id = merged.product_id,
    quantity = merged.quantity,
    total = %merged.total,
    policy = %guard.policy,
    "Cart line merged."
  );
  guard.merged_line = Some(merged);
  Ok(PipelineControl::Continue)
}
