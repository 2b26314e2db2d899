// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use storefront::{MergePolicy, SessionStore, Storefront, StorefrontConfig};
use tracing::Level;

// --- Tracing setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Mock storefront API ---

/// One request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: &'static str,
  pub path: String,
  pub authorization: Option<String>,
  pub body: Value,
}

#[derive(Debug, Default)]
pub struct MockBehaviour {
  /// Token handed out by `/login`; `None` makes every login answer 401.
  pub login_token: Option<String>,
  /// Email reported back in the login reply.
  pub login_user_email: Option<String>,
  pub products: Vec<Value>,
  /// Discounts returned by successive `/create/order` calls; 0 once drained.
  pub discounts: VecDeque<f64>,
  /// Delays applied to successive `/create/order` calls before answering.
  pub order_delays: VecDeque<Duration>,
  /// Pricing calls for this product id always answer after the given delay.
  pub slow_product: Option<(i64, Duration)>,
  pub fail_products: bool,
  pub fail_edit: bool,
  pub fail_orders: bool,
  pub requests: Vec<RecordedRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct MockApi {
  pub behaviour: Arc<Mutex<MockBehaviour>>,
  pub base_url: String,
}

impl MockApi {
  /// Starts the mock on an ephemeral local port for the current runtime.
  pub async fn start(behaviour: MockBehaviour) -> Self {
    let shared = Arc::new(Mutex::new(behaviour));
    let app = Router::new()
      .route("/api/v1/login", post(login))
      .route("/api/v1/products", get(products))
      .route("/api/v1/editproduct/{id}", put(edit_product))
      .route("/api/v1/create/order", post(create_order))
      .with_state(Arc::clone(&shared));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    MockApi {
      behaviour: shared,
      base_url: format!("http://{addr}/api/v1"),
    }
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.behaviour.lock().requests.clone()
  }

  pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
    self.requests().into_iter().filter(|r| r.path == path).collect()
  }

  pub fn set(&self, change: impl FnOnce(&mut MockBehaviour)) {
    change(&mut self.behaviour.lock());
  }

  pub fn storefront(&self, policy: MergePolicy) -> Storefront {
    self.storefront_with_session(policy, Arc::new(SessionStore::in_memory()))
  }

  pub fn storefront_with_session(&self, policy: MergePolicy, session: Arc<SessionStore>) -> Storefront {
    let config = StorefrontConfig {
      api_base_url: self.base_url.clone(),
      merge_policy: policy,
      ..StorefrontConfig::default()
    };
    Storefront::new(config, session).unwrap()
  }
}

type Shared = State<Arc<Mutex<MockBehaviour>>>;

fn record(state: &Mutex<MockBehaviour>, method: &'static str, path: String, headers: &HeaderMap, body: Value) {
  let authorization = headers
    .get("authorization")
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  state.lock().requests.push(RecordedRequest {
    method,
    path,
    authorization,
    body,
  });
}

async fn login(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  record(&state, "POST", "/login".to_string(), &headers, body.clone());
  let guard = state.lock();
  match &guard.login_token {
    Some(token) => {
      let email = guard
        .login_user_email
        .clone()
        .map(Value::String)
        .unwrap_or_else(|| body["email"].clone());
      (StatusCode::OK, Json(json!({ "token": token, "user": { "email": email } })))
    }
    None => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))),
  }
}

async fn products(State(state): Shared, headers: HeaderMap) -> (StatusCode, Json<Value>) {
  record(&state, "GET", "/products".to_string(), &headers, Value::Null);
  let guard = state.lock();
  if guard.fail_products {
    return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })));
  }
  (StatusCode::OK, Json(json!({ "products": guard.products })))
}

async fn edit_product(
  State(state): Shared,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
  record(&state, "PUT", format!("/editproduct/{id}"), &headers, body.clone());
  let mut guard = state.lock();
  if guard.fail_edit {
    return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "edit failed" })));
  }
  let Some(stored) = guard.products.iter_mut().find(|p| p["id"] == json!(id)) else {
    return (StatusCode::NOT_FOUND, Json(json!({ "error": "no such product" })));
  };
  if let (Some(stored), Some(update)) = (stored.as_object_mut(), body.as_object()) {
    for (key, value) in update {
      stored.insert(key.clone(), value.clone());
    }
  }
  let updated = stored.clone();
  (StatusCode::OK, Json(updated))
}

async fn create_order(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  let product_id = body["items"][0]["productId"].as_i64();
  record(&state, "POST", "/create/order".to_string(), &headers, body);
  let (delay, fail, discount) = {
    let mut guard = state.lock();
    let delay = match guard.slow_product {
      Some((slow_id, delay)) if Some(slow_id) == product_id => Some(delay),
      _ => guard.order_delays.pop_front(),
    };
    let discount = guard.discounts.pop_front().unwrap_or(0.0);
    (delay, guard.fail_orders, discount)
  };
  if let Some(delay) = delay {
    tokio::time::sleep(delay).await;
  }
  if fail {
    return (StatusCode::BAD_GATEWAY, Json(json!({ "error": "pricing unavailable" })));
  }
  (StatusCode::OK, Json(json!({ "discount": discount, "orderId": 77, "status": "pending" })))
}

// --- Fixtures ---

pub fn product_json(id: i64, name: &str, price: f64, enabled: bool) -> Value {
  json!({
    "id": id,
    "name": name,
    "description": format!("{name} description"),
    "price": price,
    "weight": 1.25,
    "image": format!("/img/{id}.png"),
    "isEnabled": enabled,
  })
}
