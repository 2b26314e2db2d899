// core/src/models/mod.rs

//! Typed records exchanged with the storefront API, plus the local cart line.

pub mod auth;
pub mod cart_line;
pub mod order;
pub mod product;

pub use auth::{LoginRequest, LoginResponse, LoginUser};
pub use cart_line::CartLine;
pub use order::{CustomerInfo, OrderItemRequest, OrderQuote, OrderRequest};
pub use product::{Product, ProductUpdate, ProductsEnvelope};
