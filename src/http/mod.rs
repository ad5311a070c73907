//! HTTP client module
//!
//! JSON-over-HTTP client used by the source adapters and the live tail.
//!
//! # Features
//!
//! - **Target Routing**: Operations named by the `X-Amz-Target` header
//! - **Error Classification**: Service error bodies mapped to [`Error::Api`](crate::Error::Api)
//! - **Streaming**: Long-lived response bodies for live tail sessions
//! - **REST-XML**: Plain `GET` listings with XML bodies for the bucket service

mod client;
pub(crate) mod xml;

pub use client::{
    ApiClient, ApiClientConfig, LOGS_CONTENT_TYPE, REST_XML_CONTENT_TYPE, TABLES_CONTENT_TYPE,
};

#[cfg(test)]
mod tests;
