//! Strongly-typed identifier wrappers for Fastly resources.
//!
//! Fastly identifies resources with opaque strings. Wrapping each kind in its
//! own type keeps a WAF id from being passed where a TLS domain id is expected.
//! An empty wrapper means "not set".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate strongly-typed identifier wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true when the identifier has not been set.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(WafId, "Web application firewall ID");
id_type!(WafVersionId, "WAF firewall version ID");
id_type!(TlsSubscriptionId, "TLS subscription ID");
id_type!(TlsDomainId, "TLS domain ID (the domain name itself)");
id_type!(TlsCertificateId, "TLS certificate ID");
id_type!(TlsConfigurationId, "TLS configuration ID");
id_type!(TlsAuthorizationId, "TLS authorization ID");
id_type!(TlsActivationId, "TLS activation ID");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(WafId::default().is_empty());
        assert!(!WafId::new("5tFd3Lc2Ne1bn3ROuk9sAi").is_empty());
    }

    #[test]
    fn test_display_and_as_ref() {
        let id = TlsDomainId::from("www.example.com");
        assert_eq!(id.to_string(), "www.example.com");
        assert_eq!(id.as_ref(), "www.example.com");
        assert_eq!(id.as_str(), "www.example.com");
    }

    #[test]
    fn test_serde_transparent() {
        let id = TlsSubscriptionId::new("sub-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sub-1\"");

        let parsed: TlsSubscriptionId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_into_inner() {
        let id = WafVersionId::new("ver-1");
        let inner: String = id.clone().into();
        assert_eq!(inner, id.into_inner());
    }
}
