//! axum handlers, one module per resource.
//!
//! Handlers only unpack the request and wrap the workflow's result in the
//! response envelope.

pub mod accounts;
pub mod bills;
pub mod catalog;
pub mod customers;
pub mod employees;
