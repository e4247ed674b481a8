//! Core types and trait definitions for the Stitchbook back office.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The storage backend, the workflow layer and the server all depend on it.

// Native `async fn` in trait impls; the trait declarations spell out `Send`.
#![allow(async_fn_in_trait)]

pub mod attachment;
pub mod bill;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod measurement;
pub mod profile;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
