//! API areas served by the Fastly service crates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::client::{TLS_DEFAULT_TIMEOUT, WAF_DEFAULT_TIMEOUT};
use crate::error::{Error, Result};

/// Default Fastly API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.fastly.com";

/// Areas of the Fastly management API covered by this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiArea {
    /// Platform TLS: subscriptions, domains, certificates
    Tls,
    /// Web application firewall
    Waf,
}

impl ApiArea {
    /// Returns the area name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tls => "tls",
            Self::Waf => "waf",
        }
    }

    /// Returns the label used in error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tls => "TLS API",
            Self::Waf => "WAF API",
        }
    }

    /// Returns all API areas.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Tls, Self::Waf]
    }

    /// Returns the default request timeout for the area.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        match self {
            Self::Tls => Duration::from_secs(TLS_DEFAULT_TIMEOUT),
            Self::Waf => Duration::from_secs(WAF_DEFAULT_TIMEOUT),
        }
    }
}

impl FromStr for ApiArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tls" => Ok(Self::Tls),
            "waf" => Ok(Self::Waf),
            _ => Err(Error::InvalidRequest(format!("Unknown API area: {s}"))),
        }
    }
}

impl std::fmt::Display for ApiArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for area in ApiArea::all() {
            assert_eq!(area.name().parse::<ApiArea>().unwrap(), *area);
        }
        assert!("vcl".parse::<ApiArea>().is_err());
    }

    #[test]
    fn test_default_timeouts() {
        assert_eq!(ApiArea::Tls.default_timeout(), Duration::from_secs(30));
        assert_eq!(ApiArea::Waf.default_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiArea::Waf.to_string(), "waf");
        assert_eq!(ApiArea::Tls.label(), "TLS API");
    }
}
