//! TLS client and data models for the Fastly API.
//!
//! Provides typed structures and asynchronous client utilities for managed
//! TLS subscriptions and the custom domains they cover.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{TlsClient, TlsClientBuilder};
pub use models::{
    CreateTlsSubscriptionInput, CustomTlsDomain, DeleteTlsSubscriptionInput,
    GetTlsSubscriptionInput, ListAllTlsDomainsInput, ListAllTlsSubscriptionsInput,
    ListTlsDomainsInput, ListTlsSubscriptionsInput, TlsAuthorization, TlsChallenge,
    TlsSubscription,
};

/// Convenient result alias that reuses the shared Fastly error type.
pub type Result<T> = fastly_core::Result<T>;
