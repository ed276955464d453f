//! # fastly-core
//!
//! Core types and utilities for working with the Fastly management API.
//!
//! This crate provides the shared error type, the HTTP client used by every
//! service crate, the JSON:API codec, list filter formatting and the
//! page-following lister.
//!
//! ## Modules
//!
//! - [`error`] - Error types and required-field sentinels
//! - [`id`] - Strongly-typed identifier wrappers for Fastly resources
//! - [`types`] - API areas served by the service crates
//! - [`config`] - Configuration structures for Fastly clients
//! - [`client`] - HTTP client, retry policy and connection settings
//! - [`query`] - Conversion of list inputs into query parameters
//! - [`jsonapi`] - JSON:API document decoding and encoding
//! - [`pagination`] - Single-page and all-pages listing

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod jsonapi;
pub mod pagination;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{Error, RequiredField, Result};
pub use pagination::{Page, PageCursor, PageSource, DEFAULT_PAGE_SIZE};
pub use query::{FilterValue, ListFilters, QueryParams};
