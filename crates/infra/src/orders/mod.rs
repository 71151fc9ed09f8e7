//! Order-portal adapter
//!
//! The portal has no API; orders are read by a remote browser-function
//! service that logs into the portal and scrapes the order pages.

pub mod client;

pub use client::PortalClient;
