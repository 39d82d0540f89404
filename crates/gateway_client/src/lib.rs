//! Call-and-return client for the payment gateway's tokenization API.
//!
//! The client authenticates every request with the short-lived authorization
//! fingerprint carried by an [`auth::AuthContext`], creates and retrieves
//! tokenized payment-method records, mediates the external wallet redirect
//! flow and classifies every gateway response into a typed outcome.
//!
//! All network operations are `async fn`s awaited on the caller's runtime.
//! The crate spawns no tasks, performs no retries and imposes no internal
//! timeout; cancellation and scheduling belong to the caller.

#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod analytics;
pub mod auth;
pub mod client;
pub mod consts;
pub mod device_data;
pub mod errors;
pub mod payment_methods;
pub mod redirect;
pub mod request;
pub mod services;
pub mod types;

pub use self::{
    auth::AuthContext,
    client::GatewayClient,
    errors::{CustomResult, GatewayError},
    payment_methods::PaymentMethod,
};
