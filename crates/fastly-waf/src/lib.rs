//! WAF client and data models for the Fastly API.
//!
//! Provides typed structures and asynchronous client utilities for listing,
//! inspecting, updating, locking, cloning and deploying web application
//! firewall versions.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{WafClient, WafClientBuilder};
pub use models::{
    ListAllWafVersionsInput, ListWafVersionsInput, UpdateWafVersionInput, WafVersion,
    WafVersionKey,
};

/// Convenient result alias that reuses the shared Fastly error type.
pub type Result<T> = fastly_core::Result<T>;
