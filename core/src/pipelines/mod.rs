// core/src/pipelines/mod.rs

//! The storefront's multi-step flows, each expressed as a `Pipeline` of named
//! steps over its own context struct.

pub mod contexts;

pub mod cart_pipeline;
pub mod signin_pipeline;
pub mod toggle_pipeline;
