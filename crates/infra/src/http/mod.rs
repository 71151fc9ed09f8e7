//! HTTP client infrastructure

pub mod client;

pub use client::{HttpClient, HttpOptions};
