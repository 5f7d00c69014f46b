//! IVSS backend client.
//!
//! [`RemoteCaller`] is the single path to the backend: it attaches the
//! cached bearer token, classifies every response into a [`CallOutcome`]
//! and clears the token when the backend rejects it. The screen-level
//! operations in [`services`] are built on top of it.

pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod services;
pub mod transport;
pub mod types;
pub mod wrapper;

#[cfg(test)]
mod test_support;

pub use client::IvssClient;
pub use config::{ClientConfig, FallbackPolicy};
pub use error::{ApiRetryClass, ClientError, Result};
pub use outcome::{classify, CallOutcome, INVALID_TOKEN_SENTINEL};
pub use services::ServiceContext;
pub use transport::{ApiRequest, HttpTransport, RawResponse};
pub use types::Persistence;
pub use wrapper::RemoteCaller;
