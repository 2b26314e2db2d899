// core/src/pipelines/toggle_pipeline.rs

use crate::catalog::{self, ToggleOutcome};
use crate::error::{StoreError, StoreResult};
use crate::flow::{ContextData, Pipeline, PipelineControl};
use crate::pipelines::contexts::ToggleStatusCtxData;
use tracing::{debug, info};

pub fn build_toggle_status_pipeline() -> StoreResult<Pipeline<ToggleStatusCtxData>> {
  let mut p = Pipeline::<ToggleStatusCtxData>::new(
    "toggle_product_status",
    &[
      ("find_cached_product", false),
      ("send_flipped_record", false),
      ("reload_catalog", false),
    ],
  );

  p.on_root("find_cached_product", find_cached_product)?;
  p.on_root("send_flipped_record", send_flipped_record)?;
  p.on_root("reload_catalog", reload_catalog)?;
  Ok(p)
}

// Stops the run (no request at all) when the id is not in the cache.
async fn find_cached_product(ctx_data: ContextData<ToggleStatusCtxData>) -> StoreResult<PipelineControl> {
  let (product_id, cached) = {
    let guard = ctx_data.read();
    let cached = guard.catalog.read().products.iter().find(|p| p.id == guard.product_id).cloned();
    (guard.product_id, cached)
  };

  let Some(product) = cached else {
    ctx_data.write().outcome = Some(ToggleOutcome::NotCached);
    return Ok(PipelineControl::Stop);
  };

  debug!(product_id, currently_enabled = product.is_enabled, "Cached product found for toggle.");
  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

async fn send_flipped_record(ctx_data: ContextData<ToggleStatusCtxData>) -> StoreResult<PipelineControl> {
  let (api, product) = {
    let guard = ctx_data.read();
    (guard.api.clone(), guard.product.clone())
  };
  let product = product.ok_or_else(|| StoreError::Internal("toggle run lost its cached product".to_string()))?;

  let update = product.status_flipped();
  api.edit_product(product.id, &update).await?;
  info!(product_id = product.id, is_enabled = update.is_enabled, "Product status updated.");

  {
    let mut guard = ctx_data.write();
    guard.record_sent = true;
    guard.outcome = Some(ToggleOutcome::Toggled {
      product_id: product.id,
      is_enabled: update.is_enabled,
    });
  }
  Ok(PipelineControl::Continue)
}

async fn reload_catalog(ctx_data: ContextData<ToggleStatusCtxData>) -> StoreResult<PipelineControl> {
  let (api, state) = {
    let guard = ctx_data.read();
    (guard.api.clone(), guard.catalog.clone())
  };
  catalog::refresh(&api, &state).await?;
  Ok(PipelineControl::Continue)
}
