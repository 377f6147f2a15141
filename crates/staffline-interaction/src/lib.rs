//! HTTP side of the Staffline client.
//!
//! [`ApiClient`] implements every gateway trait from
//! `staffline_core::gateway` against the ATS REST API.

pub mod api_client;
pub mod envelope;
mod gateways;

#[cfg(test)]
mod test_server;

pub use api_client::ApiClient;
