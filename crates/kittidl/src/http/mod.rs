//! HTTP transport for bucket downloads.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
