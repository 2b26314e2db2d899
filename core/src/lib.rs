// src/lib.rs

//! Storefront: the client side of a small shop.
//!
//! The crate covers:
//!  - A session store holding the bearer token and the user's email,
//!    persisted through a pluggable backend.
//!  - A request layer over `reqwest` that attaches the token to every call
//!    and validates response records at the boundary.
//!  - A catalog view with loading/ready/error state and status toggling.
//!  - An in-memory cart whose discounts come from a remote pricing authority,
//!    with an explicit merge policy and per-product serialization.
//!
//! Multi-step actions (sign-in, status toggle, add-to-cart) run as
//! [`Pipeline`]s of named async steps over a shared [`ContextData`].

pub mod cart;
pub mod catalog;
pub mod client;
pub mod error;
pub mod flow;
pub mod models;
pub mod pipelines;
pub mod session;
pub mod storefront;

// --- Re-exports for the Public API ---

pub use crate::cart::{Cart, MergePolicy};
pub use crate::catalog::{Catalog, CatalogStatus, CatalogView, ToggleOutcome};
pub use crate::client::{ApiClient, DEFAULT_API_BASE_URL};
pub use crate::error::{StoreError, StoreResult};
pub use crate::flow::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::models::{CartLine, CustomerInfo, OrderQuote, Product};
pub use crate::session::{FileBackend, MemoryBackend, Session, SessionBackend, SessionStore};
pub use crate::storefront::{Storefront, StorefrontConfig, DEFAULT_CUSTOMER_ADDRESS};

// Decimal is part of the public surface (prices, discounts, totals).
pub use rust_decimal::Decimal;
