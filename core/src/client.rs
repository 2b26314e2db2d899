// core/src/client.rs

//! The request layer: one wrapper around `reqwest` through which every call to
//! the storefront API goes.
//!
//! The current session token is read at send time and attached as a bearer
//! credential when present. There is no retry, timeout or backoff policy: a
//! call resolves with a decoded body or fails with the transport/HTTP error.

use crate::error::{StoreError, StoreResult};
use crate::models::{LoginRequest, LoginResponse, OrderQuote, OrderRequest, Product, ProductUpdate, ProductsEnvelope};
use crate::session::SessionStore;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";

#[derive(Debug, Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: String,
  session: Arc<SessionStore>,
}

impl ApiClient {
  /// Builds a client for `base_url`, authenticating with whatever `session` holds.
  pub fn new(base_url: &str, session: Arc<SessionStore>) -> StoreResult<Self> {
    let parsed = Url::parse(base_url).map_err(|e| StoreError::InvalidBaseUrl {
      url: base_url.to_string(),
      reason: e.to_string(),
    })?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
      return Err(StoreError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: "expected an absolute http(s) URL".to_string(),
      });
    }

    Ok(Self {
      http: reqwest::Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
      session,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
    match self.session.token() {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  async fn send(&self, path: &str, builder: RequestBuilder) -> StoreResult<Response> {
    let response = self.authorized(builder).send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(path, status = status.as_u16(), "API request failed.");
      return Err(StoreError::Status {
        path: path.to_string(),
        status: status.as_u16(),
        body,
      });
    }
    debug!(path, status = status.as_u16(), "API request succeeded.");
    Ok(response)
  }

  async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> StoreResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::MalformedResponse {
      path: path.to_string(),
      reason: e.to_string(),
    })
  }

  #[instrument(name = "ApiClient::get", skip(self))]
  pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
    let response = self.send(path, self.http.get(self.url(path))).await?;
    Self::decode(path, response).await
  }

  #[instrument(name = "ApiClient::post", skip(self, body))]
  pub async fn post_json<B, T>(&self, path: &str, body: &B) -> StoreResult<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let response = self.send(path, self.http.post(self.url(path)).json(body)).await?;
    Self::decode(path, response).await
  }

  /// PUTs `body`; the response body is not read.
  #[instrument(name = "ApiClient::put", skip(self, body))]
  pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> StoreResult<()> {
    self.send(path, self.http.put(self.url(path)).json(body)).await?;
    Ok(())
  }

  // --- Storefront endpoints ---

  /// `POST /login`. An empty token in the reply is treated as malformed.
  pub async fn login(&self, email: &str, password: &str) -> StoreResult<LoginResponse> {
    let reply: LoginResponse = self.post_json("/login", &LoginRequest { email, password }).await?;
    if reply.token.trim().is_empty() {
      return Err(StoreError::MalformedResponse {
        path: "/login".to_string(),
        reason: "empty session token".to_string(),
      });
    }
    Ok(reply)
  }

  /// `GET /products`. Any invalid record rejects the whole list.
  pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let envelope: ProductsEnvelope = self.get_json("/products").await?;
    for product in &envelope.products {
      product.validate().map_err(|reason| StoreError::MalformedResponse {
        path: "/products".to_string(),
        reason,
      })?;
    }
    Ok(envelope.products)
  }

  /// `PUT /editproduct/{id}` with the complete record.
  pub async fn edit_product(&self, product_id: i64, update: &ProductUpdate<'_>) -> StoreResult<()> {
    self.put_json(&format!("/editproduct/{product_id}"), update).await
  }

  /// `POST /create/order`, used to obtain the discount for an addition.
  pub async fn create_order(&self, request: &OrderRequest) -> StoreResult<OrderQuote> {
    let quote: OrderQuote = self.post_json("/create/order", request).await?;
    quote.validate().map_err(|reason| StoreError::MalformedResponse {
      path: "/create/order".to_string(),
      reason,
    })?;
    Ok(quote)
  }
}
