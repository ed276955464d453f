//! WAF firewall version models.

use chrono::{DateTime, Utc};
use fastly_core::id::{WafId, WafVersionId};
use fastly_core::jsonapi::{Included, JsonApiResource, ResourceObject};
use fastly_core::query::{FilterValue, ListFilters};
use fastly_core::{Error, RequiredField, Result};
use serde::{Deserialize, Serialize};

/// JSON:API type of a WAF firewall version.
pub const WAF_VERSION_TYPE: &str = "waf_firewall_version";

/// A version of a web application firewall's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WafVersion {
    /// Version resource ID.
    #[serde(skip)]
    pub id: WafVersionId,
    /// Version number.
    pub number: u32,
    /// Whether this version is the active one.
    pub active: bool,
    /// Whether the version is locked against edits.
    pub locked: bool,
    /// Whether CRS validates UTF-8 encoding.
    pub crs_validate_utf8_encoding: bool,
    /// Free-form comment.
    pub comment: String,
    /// Last deployment error, if any.
    pub error: String,
    /// When the version was last deployed.
    pub deployed_at: Option<DateTime<Utc>>,
    /// Allowed HTTP versions.
    pub allowed_http_versions: String,
    /// Allowed HTTP methods.
    pub allowed_methods: String,
    /// Allowed request content types.
    pub allowed_request_content_type: String,
    /// Allowed request content type charsets.
    pub allowed_request_content_type_charset: String,
    /// Country codes considered high risk.
    pub high_risk_country_codes: String,
    /// Restricted file extensions.
    pub restricted_extensions: String,
    /// Restricted request headers.
    pub restricted_headers: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Maximum argument value length.
    pub arg_length: u32,
    /// Maximum argument name length.
    pub arg_name_length: u32,
    /// Maximum combined size of uploaded files.
    pub combined_file_sizes: u32,
    /// Critical anomaly score.
    pub critical_anomaly_score: u32,
    /// Error anomaly score.
    pub error_anomaly_score: u32,
    /// HTTP violation score threshold.
    pub http_violation_score_threshold: u32,
    /// Inbound anomaly score threshold.
    pub inbound_anomaly_score_threshold: u32,
    /// Local file inclusion score threshold.
    pub lfi_score_threshold: u32,
    /// Maximum size of a single uploaded file.
    pub max_file_size: u32,
    /// Maximum number of arguments.
    pub max_num_args: u32,
    /// Notice anomaly score.
    pub notice_anomaly_score: u32,
    /// CRS paranoia level.
    pub paranoia_level: u32,
    /// PHP injection score threshold.
    pub php_injection_score_threshold: u32,
    /// Remote code execution score threshold.
    pub rce_score_threshold: u32,
    /// Remote file inclusion score threshold.
    pub rfi_score_threshold: u32,
    /// Session fixation score threshold.
    pub session_fixation_score_threshold: u32,
    /// SQL injection score threshold.
    pub sql_injection_score_threshold: u32,
    /// Maximum total argument length.
    pub total_arg_length: u32,
    /// Warning anomaly score.
    pub warning_anomaly_score: u32,
    /// Cross-site scripting score threshold.
    pub xss_score_threshold: u32,
    /// Active Trustwave rules in log mode.
    pub active_rules_trustwave_log_count: u32,
    /// Active Trustwave rules in block mode.
    pub active_rules_trustwave_block_count: u32,
    /// Active Fastly rules in log mode.
    pub active_rules_fastly_log_count: u32,
    /// Active Fastly rules in block mode.
    pub active_rules_fastly_block_count: u32,
    /// Active OWASP rules in log mode.
    pub active_rules_owasp_log_count: u32,
    /// Active OWASP rules in block mode.
    pub active_rules_owasp_block_count: u32,
}

impl JsonApiResource for WafVersion {
    const TYPE: &'static str = WAF_VERSION_TYPE;

    fn from_object(object: ResourceObject, _included: &Included) -> Result<Self> {
        let mut version: WafVersion = object.attributes()?;
        version.id = WafVersionId::from(object.id);
        Ok(version)
    }
}

/// Input for listing one page of WAF versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWafVersionsInput {
    /// Firewall whose versions are listed (required).
    pub waf_id: WafId,
    /// Records per page; `0` leaves the server default.
    pub page_size: u32,
    /// Page to fetch; `0` leaves the server default.
    pub page_number: u32,
    /// Comma-separated relationships to include.
    pub include: String,
}

impl ListWafVersionsInput {
    /// Input for the first page of the given firewall's versions.
    #[must_use]
    pub fn new(waf_id: impl Into<WafId>) -> Self {
        Self {
            waf_id: waf_id.into(),
            ..Self::default()
        }
    }
}

impl ListFilters for ListWafVersionsInput {
    fn filter_fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("page[size]", self.page_size.into()),
            ("page[number]", self.page_number.into()),
            ("include", (&self.include).into()),
        ]
    }
}

/// Input for listing every WAF version of a firewall.
///
/// The page size comes from the client, see `WafClientBuilder::with_page_size`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllWafVersionsInput {
    /// Firewall whose versions are listed (required).
    pub waf_id: WafId,
    /// Comma-separated relationships to include.
    pub include: String,
}

impl ListAllWafVersionsInput {
    /// Input for all versions of the given firewall.
    #[must_use]
    pub fn new(waf_id: impl Into<WafId>) -> Self {
        Self {
            waf_id: waf_id.into(),
            include: String::new(),
        }
    }

    /// Single-page input for the given page.
    #[must_use]
    pub fn page(&self, page_number: u32, page_size: u32) -> ListWafVersionsInput {
        ListWafVersionsInput {
            waf_id: self.waf_id.clone(),
            page_size,
            page_number,
            include: self.include.clone(),
        }
    }
}

/// Identifies one version of a firewall.
///
/// Used to get, lock, clone and deploy a version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WafVersionKey {
    /// Firewall ID (required).
    pub waf_id: WafId,
    /// Version number (required, non-zero).
    pub waf_version_number: u32,
}

impl WafVersionKey {
    /// Create a key.
    #[must_use]
    pub fn new(waf_id: impl Into<WafId>, waf_version_number: u32) -> Self {
        Self {
            waf_id: waf_id.into(),
            waf_version_number,
        }
    }

    /// Check that both parts of the key are set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] naming the first missing part.
    pub fn validate(&self) -> Result<()> {
        if self.waf_id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::WafId));
        }
        if self.waf_version_number == 0 {
            return Err(Error::MissingRequiredField(RequiredField::WafVersionNumber));
        }
        Ok(())
    }

    /// Path of the version resource.
    #[must_use]
    pub fn path(&self) -> String {
        format!(
            "waf/firewalls/{}/versions/{}",
            self.waf_id, self.waf_version_number
        )
    }
}

/// Input for updating a WAF version.
///
/// Only attributes that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateWafVersionInput {
    /// Firewall ID (required).
    #[serde(skip)]
    pub waf_id: WafId,
    /// Version resource ID (required).
    #[serde(skip)]
    pub waf_version_id: WafVersionId,
    /// Version number (required, non-zero).
    #[serde(skip)]
    pub waf_version_number: u32,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether CRS validates UTF-8 encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs_validate_utf8_encoding: Option<bool>,
    /// Allowed HTTP versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_http_versions: Option<String>,
    /// Allowed HTTP methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<String>,
    /// Allowed request content types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_request_content_type: Option<String>,
    /// Allowed request content type charsets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_request_content_type_charset: Option<String>,
    /// Country codes considered high risk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_risk_country_codes: Option<String>,
    /// Restricted file extensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_extensions: Option<String>,
    /// Restricted request headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_headers: Option<String>,
    /// Maximum argument value length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_length: Option<u32>,
    /// Maximum argument name length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_name_length: Option<u32>,
    /// Maximum combined size of uploaded files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_file_sizes: Option<u32>,
    /// Critical anomaly score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_anomaly_score: Option<u32>,
    /// Error anomaly score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_anomaly_score: Option<u32>,
    /// HTTP violation score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_violation_score_threshold: Option<u32>,
    /// Inbound anomaly score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound_anomaly_score_threshold: Option<u32>,
    /// Local file inclusion score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfi_score_threshold: Option<u32>,
    /// Maximum size of a single uploaded file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u32>,
    /// Maximum number of arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_args: Option<u32>,
    /// Notice anomaly score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_anomaly_score: Option<u32>,
    /// CRS paranoia level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paranoia_level: Option<u32>,
    /// PHP injection score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_injection_score_threshold: Option<u32>,
    /// Remote code execution score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rce_score_threshold: Option<u32>,
    /// Remote file inclusion score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfi_score_threshold: Option<u32>,
    /// Session fixation score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_fixation_score_threshold: Option<u32>,
    /// SQL injection score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_injection_score_threshold: Option<u32>,
    /// Maximum total argument length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_arg_length: Option<u32>,
    /// Warning anomaly score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_anomaly_score: Option<u32>,
    /// Cross-site scripting score threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xss_score_threshold: Option<u32>,
}

impl UpdateWafVersionInput {
    /// Start an update of the given version.
    #[must_use]
    pub fn new(
        waf_id: impl Into<WafId>,
        waf_version_number: u32,
        waf_version_id: impl Into<WafVersionId>,
    ) -> Self {
        Self {
            waf_id: waf_id.into(),
            waf_version_number,
            waf_version_id: waf_version_id.into(),
            ..Self::default()
        }
    }

    /// Key of the version being updated.
    #[must_use]
    pub fn key(&self) -> WafVersionKey {
        WafVersionKey::new(self.waf_id.clone(), self.waf_version_number)
    }

    /// Check the identifying fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        self.key().validate()?;
        if self.waf_version_id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::WafVersionId));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_input_formats_documented_example() {
        let input = ListWafVersionsInput {
            waf_id: WafId::new("waf-1"),
            page_size: 2,
            page_number: 2,
            include: "included".to_string(),
        };

        let params = input.format_filters();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("page[size]"), Some("2"));
        assert_eq!(params.get("page[number]"), Some("2"));
        assert_eq!(params.get("include"), Some("included"));
    }

    #[test]
    fn list_input_never_sends_waf_id_as_filter() {
        let params = ListWafVersionsInput::new("waf-1").format_filters();
        assert!(params.is_empty());
    }

    #[test]
    fn list_all_input_carries_id_and_include_into_each_page() {
        let all = ListAllWafVersionsInput {
            waf_id: WafId::new("waf-1"),
            include: "waf_firewall".to_string(),
        };
        let page = all.page(2, 20);
        assert_eq!(page.waf_id.as_str(), "waf-1");
        assert_eq!(page.include, "waf_firewall");
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn key_validation_order() {
        assert_eq!(
            WafVersionKey::new("", 0).validate(),
            Err(Error::MissingRequiredField(RequiredField::WafId))
        );
        assert_eq!(
            WafVersionKey::new("waf-1", 0).validate(),
            Err(Error::MissingRequiredField(RequiredField::WafVersionNumber))
        );
        assert!(WafVersionKey::new("waf-1", 3).validate().is_ok());
        assert_eq!(
            WafVersionKey::new("waf-1", 3).path(),
            "waf/firewalls/waf-1/versions/3"
        );
    }

    #[test]
    fn update_requires_version_id() {
        let input = UpdateWafVersionInput::new("waf-1", 1, "");
        assert_eq!(
            input.validate(),
            Err(Error::MissingRequiredField(RequiredField::WafVersionId))
        );
    }

    #[test]
    fn update_serializes_only_set_attributes() {
        let input = UpdateWafVersionInput {
            comment: Some("tighten".to_string()),
            paranoia_level: Some(3),
            crs_validate_utf8_encoding: Some(false),
            ..UpdateWafVersionInput::new("waf-1", 1, "ver-1")
        };

        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "comment": "tighten",
                "crs_validate_utf8_encoding": false,
                "paranoia_level": 3
            })
        );
    }

    #[test]
    fn version_from_object_keeps_id() {
        let object: ResourceObject = serde_json::from_value(json!({
            "id": "ver-1",
            "type": "waf_firewall_version",
            "attributes": {
                "number": 2,
                "active": true,
                "comment": "initial",
                "paranoia_level": 1,
                "deployed_at": "2020-05-04T11:01:29Z"
            }
        }))
        .unwrap();

        let version = WafVersion::from_object(object, &Included::default()).unwrap();
        assert_eq!(version.id.as_str(), "ver-1");
        assert_eq!(version.number, 2);
        assert!(version.active);
        assert!(!version.locked);
        assert_eq!(version.paranoia_level, 1);
        assert!(version.deployed_at.is_some());
        assert!(version.created_at.is_none());
    }
}
