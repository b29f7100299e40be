//! Network module
//!
//! HTTP client used to reach the hosted search bundle.

mod client;

pub use client::HttpClient;
