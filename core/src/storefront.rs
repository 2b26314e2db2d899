// core/src/storefront.rs

//! `Storefront`: the context object built once at start-up. It owns the
//! session, the request layer, the catalog, the cart and the prebuilt
//! pipelines, and every user action goes through it.

use crate::cart::{Cart, MergePolicy, ProductQueues};
use crate::catalog::{Catalog, ToggleOutcome};
use crate::client::{ApiClient, DEFAULT_API_BASE_URL};
use crate::error::{StoreError, StoreResult};
use crate::flow::{ContextData, Pipeline, PipelineResult};
use crate::models::{CartLine, CustomerInfo, Product};
use crate::pipelines::cart_pipeline::build_add_to_cart_pipeline;
use crate::pipelines::contexts::{AddToCartCtxData, SigninCtxData};
use crate::pipelines::signin_pipeline::build_signin_pipeline;
use crate::session::SessionStore;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_CUSTOMER_ADDRESS: &str = "456 Oak Street";

/// Customer name sent on pricing requests when no user identity is stored.
pub const ANONYMOUS_CUSTOMER_NAME: &str = "Test";
/// Customer email sent on pricing requests when no user identity is stored.
pub const ANONYMOUS_CUSTOMER_EMAIL: &str = "--";

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
  pub api_base_url: String,
  /// Shipping address sent with every pricing request.
  pub customer_address: String,
  pub merge_policy: MergePolicy,
}

impl Default for StorefrontConfig {
  fn default() -> Self {
    Self {
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      customer_address: DEFAULT_CUSTOMER_ADDRESS.to_string(),
      merge_policy: MergePolicy::default(),
    }
  }
}

#[derive(Debug)]
pub struct Storefront {
  config: StorefrontConfig,
  session: Arc<SessionStore>,
  api: Arc<ApiClient>,
  catalog: Catalog,
  cart: ContextData<Cart>,
  product_queues: ProductQueues,
  signin_pipeline: Pipeline<SigninCtxData>,
  cart_pipeline: Pipeline<AddToCartCtxData>,
}

impl Storefront {
  pub fn new(config: StorefrontConfig, session: Arc<SessionStore>) -> StoreResult<Self> {
    let api = Arc::new(ApiClient::new(&config.api_base_url, Arc::clone(&session))?);
    let catalog = Catalog::new(Arc::clone(&api))?;

    info!(
      api_base_url = %api.base_url(),
      merge_policy = %config.merge_policy,
      "Storefront initialised."
    );
    Ok(Self {
      config,
      session,
      api,
      catalog,
      cart: ContextData::default(),
      product_queues: ProductQueues::default(),
      signin_pipeline: build_signin_pipeline()?,
      cart_pipeline: build_add_to_cart_pipeline()?,
    })
  }

  pub fn session(&self) -> &Arc<SessionStore> {
    &self.session
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  /// A copy of the cart as it is now.
  pub fn cart(&self) -> Cart {
    self.cart.snapshot()
  }

  // --- Session ---

  /// Validates the credentials, exchanges them for a token and stores both
  /// the token and the returned user email in the session.
  #[instrument(name = "Storefront::login", skip(self, password))]
  pub async fn login(&self, email: &str, password: &str) -> StoreResult<()> {
    let ctx_data = ContextData::new(SigninCtxData {
      api: Arc::clone(&self.api),
      session: Arc::clone(&self.session),
      email: email.to_string(),
      password: password.to_string(),
      issued_token: None,
      user_email_from_response: None,
    });

    match self.signin_pipeline.run(ctx_data).await {
      Ok(PipelineResult::Completed) => Ok(()),
      Ok(PipelineResult::Stopped) => Err(StoreError::Internal("sign-in was halted".to_string())),
      Err(e) => {
        warn!(error = %e, "Login failed.");
        Err(e)
      }
    }
  }

  pub fn logout(&self) -> StoreResult<()> {
    self.session.logout()
  }

  pub fn set_user_identity(&self, email: &str) -> StoreResult<()> {
    self.session.set_user_identity(email)
  }

  // --- Catalog ---

  pub async fn load_products(&self) -> StoreResult<usize> {
    self.catalog.load_products().await
  }

  pub async fn toggle_enabled(&self, product_id: i64) -> StoreResult<ToggleOutcome> {
    self.catalog.toggle_enabled(product_id).await
  }

  // --- Cart ---

  /// Customer details sent with pricing requests, taken from the session.
  pub fn customer_info(&self) -> CustomerInfo {
    let user_email = self.session.user_email();
    CustomerInfo {
      name: user_email.clone().unwrap_or_else(|| ANONYMOUS_CUSTOMER_NAME.to_string()),
      email: user_email.unwrap_or_else(|| ANONYMOUS_CUSTOMER_EMAIL.to_string()),
      address: self.config.customer_address.clone(),
    }
  }

  /// Prices `quantity` units of `product` with the pricing authority and
  /// merges the result into the cart.
  ///
  /// Additions of the same product wait for each other. On any failure the
  /// cart is left unchanged; the error is logged and returned.
  #[instrument(name = "Storefront::add_to_cart", skip(self, product), fields(product_id = product.id))]
  pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> StoreResult<CartLine> {
    let _turn = self.product_queues.acquire(product.id).await;

    let ctx_data = ContextData::new(AddToCartCtxData {
      api: Arc::clone(&self.api),
      cart: self.cart.clone(),
      customer: self.customer_info(),
      product: product.clone(),
      quantity,
      policy: self.config.merge_policy,
      priced_quantity: None,
      quote: None,
      line: None,
      merged_line: None,
    });

    let outcome = match self.cart_pipeline.run(ctx_data.clone()).await {
      Ok(PipelineResult::Completed) => {
        let merged = ctx_data.write().merged_line.take();
        merged.ok_or_else(|| StoreError::Internal("add to cart completed without a merged line".to_string()))
      }
      Ok(PipelineResult::Stopped) => Err(StoreError::Internal("add to cart was halted".to_string())),
      Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
      error!(product_id = product.id, error = %e, "Error adding to cart.");
    }
    outcome
  }

  /// Adds a product picked from the cached catalog by id.
  pub async fn add_to_cart_by_id(&self, product_id: i64, quantity: u32) -> StoreResult<CartLine> {
    let product = self
      .catalog
      .product(product_id)
      .ok_or_else(|| StoreError::Validation(format!("Product {product_id} is not in the catalog.")))?;
    self.add_to_cart(&product, quantity).await
  }
}
