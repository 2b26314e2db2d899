// core/src/catalog.rs

//! The catalog view: the cached product list and its visible state.

use crate::client::ApiClient;
use crate::error::StoreResult;
use crate::flow::{ContextData, Pipeline, PipelineResult};
use crate::models::Product;
use crate::pipelines::contexts::ToggleStatusCtxData;
use crate::pipelines::toggle_pipeline;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products";
pub const TOGGLE_FAILED_MESSAGE: &str = "Failed to update product status";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
  /// Nothing fetched yet.
  #[default]
  Loading,
  Ready,
  /// Persistent error shown in place of the listing.
  Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
  pub products: Vec<Product>,
  pub status: CatalogStatus,
}

/// What a front end should render right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
  Loading,
  Ready(Vec<Product>),
  Failed(String),
}

/// Result of a status toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
  /// The flipped record was sent and the list re-fetched. `is_enabled` is the
  /// value that was sent.
  Toggled { product_id: i64, is_enabled: bool },
  /// The id is not in the cached list; nothing was sent.
  NotCached,
}

#[derive(Debug)]
pub struct Catalog {
  api: Arc<ApiClient>,
  state: ContextData<CatalogState>,
  toggle_pipeline: Pipeline<ToggleStatusCtxData>,
}

impl Catalog {
  pub fn new(api: Arc<ApiClient>) -> StoreResult<Self> {
    Ok(Self {
      api,
      state: ContextData::default(),
      toggle_pipeline: toggle_pipeline::build_toggle_status_pipeline()?,
    })
  }

  pub fn view(&self) -> CatalogView {
    let guard = self.state.read();
    match &guard.status {
      CatalogStatus::Loading => CatalogView::Loading,
      CatalogStatus::Ready => CatalogView::Ready(guard.products.clone()),
      CatalogStatus::Failed(message) => CatalogView::Failed(message.clone()),
    }
  }

  pub fn status(&self) -> CatalogStatus {
    self.state.read().status.clone()
  }

  /// The cached list, in the order the API returned it.
  pub fn products(&self) -> Vec<Product> {
    self.state.read().products.clone()
  }

  pub fn product(&self, product_id: i64) -> Option<Product> {
    self.state.read().products.iter().find(|p| p.id == product_id).cloned()
  }

  /// Fetches the full list and replaces the cache wholesale.
  ///
  /// On failure the catalog enters its error state and the error is returned.
  pub async fn load_products(&self) -> StoreResult<usize> {
    refresh(&self.api, &self.state).await
  }

  /// Flips the enabled flag of a cached product on the server, then reloads.
  ///
  /// No optimistic update is made: the cache only changes through the reload.
  #[instrument(name = "Catalog::toggle_enabled", skip(self))]
  pub async fn toggle_enabled(&self, product_id: i64) -> StoreResult<ToggleOutcome> {
    let ctx_data = ContextData::new(ToggleStatusCtxData {
      api: Arc::clone(&self.api),
      catalog: self.state.clone(),
      product_id,
      product: None,
      record_sent: false,
      outcome: None,
    });

    match self.toggle_pipeline.run(ctx_data.clone()).await {
      Ok(PipelineResult::Completed | PipelineResult::Stopped) => {
        let outcome = ctx_data.read().outcome.unwrap_or(ToggleOutcome::NotCached);
        if outcome == ToggleOutcome::NotCached {
          warn!(product_id, "Toggle requested for a product that is not cached; ignoring.");
        }
        Ok(outcome)
      }
      Err(e) => {
        // A failed reload has already recorded its own message.
        if !ctx_data.read().record_sent {
          fail(&self.state, TOGGLE_FAILED_MESSAGE);
        }
        error!(product_id, error = %e, "Product status toggle failed.");
        Err(e)
      }
    }
  }
}

/// Re-fetches the product list into `state`.
pub(crate) async fn refresh(api: &ApiClient, state: &ContextData<CatalogState>) -> StoreResult<usize> {
  match api.list_products().await {
    Ok(products) => {
      let count = products.len();
      {
        let mut guard = state.write();
        guard.products = products;
        guard.status = CatalogStatus::Ready;
      }
      info!(count, "Product list loaded.");
      Ok(count)
    }
    Err(e) => {
      fail(state, LOAD_FAILED_MESSAGE);
      error!(error = %e, "Failed to load products.");
      Err(e)
    }
  }
}

fn fail(state: &ContextData<CatalogState>, message: &str) {
  state.write().status = CatalogStatus::Failed(message.to_string());
}
