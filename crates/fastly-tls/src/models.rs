//! TLS subscription and custom TLS domain models.

use chrono::{DateTime, Utc};
use fastly_core::id::{
    TlsActivationId, TlsAuthorizationId, TlsCertificateId, TlsConfigurationId, TlsDomainId,
    TlsSubscriptionId,
};
use fastly_core::jsonapi::{
    Included, JsonApiResource, RelationshipData, ResourceIdentifier, ResourceObject,
};
use fastly_core::query::{FilterValue, ListFilters};
use fastly_core::{Error, RequiredField, Result};
use serde::{Deserialize, Serialize};

/// JSON:API type of a TLS subscription.
pub const TLS_SUBSCRIPTION_TYPE: &str = "tls_subscription";
/// JSON:API type of a TLS authorization.
pub const TLS_AUTHORIZATION_TYPE: &str = "tls_authorization";
/// JSON:API type of a custom TLS domain.
pub const TLS_DOMAIN_TYPE: &str = "tls_domain";
/// JSON:API type of a TLS configuration.
pub const TLS_CONFIGURATION_TYPE: &str = "tls_configuration";

/// A managed TLS certificate subscription.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TlsSubscription {
    /// Subscription ID.
    pub id: TlsSubscriptionId,
    /// Issuing certificate authority, e.g. `lets-encrypt`.
    pub certificate_authority: String,
    /// Subscription state, e.g. `pending`, `processing`, `issued`.
    pub state: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// TLS configuration the certificate is served with.
    pub configuration: Option<TlsConfigurationId>,
    /// Domains covered by the subscription.
    pub domains: Vec<TlsDomainId>,
    /// Certificates issued for the subscription.
    pub certificates: Vec<TlsCertificateId>,
    /// Domain ownership authorizations.
    ///
    /// Only the id is populated unless `tls_authorizations` was included in
    /// the request.
    pub authorizations: Vec<TlsAuthorization>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SubscriptionAttributes {
    certificate_authority: String,
    state: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl JsonApiResource for TlsSubscription {
    const TYPE: &'static str = TLS_SUBSCRIPTION_TYPE;

    fn from_object(object: ResourceObject, included: &Included) -> Result<Self> {
        let attributes: SubscriptionAttributes = object.attributes()?;

        let authorizations = object
            .related("tls_authorizations")
            .iter()
            .map(|identifier| -> Result<TlsAuthorization> {
                Ok(included
                    .resolve::<TlsAuthorization>(&identifier.id)?
                    .unwrap_or_else(|| TlsAuthorization {
                        id: TlsAuthorizationId::new(identifier.id.clone()),
                        ..TlsAuthorization::default()
                    }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            configuration: object.related_id("tls_configuration"),
            domains: object.related_ids("tls_domains"),
            certificates: object.related_ids("tls_certificates"),
            authorizations,
            certificate_authority: attributes.certificate_authority,
            state: attributes.state,
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            id: TlsSubscriptionId::from(object.id),
        })
    }
}

/// Proof of domain ownership required before a certificate is issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TlsAuthorization {
    /// Authorization ID.
    #[serde(skip)]
    pub id: TlsAuthorizationId,
    /// Ways the domain can be verified.
    pub challenges: Vec<TlsChallenge>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Authorization state.
    pub state: String,
}

impl JsonApiResource for TlsAuthorization {
    const TYPE: &'static str = TLS_AUTHORIZATION_TYPE;

    fn from_object(object: ResourceObject, _included: &Included) -> Result<Self> {
        let mut authorization: TlsAuthorization = object.attributes()?;
        authorization.id = TlsAuthorizationId::from(object.id);
        Ok(authorization)
    }
}

/// A DNS record that satisfies an authorization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TlsChallenge {
    /// Challenge type, e.g. `managed-dns` or `managed-http-cname`.
    #[serde(rename = "type")]
    pub kind: String,
    /// DNS record type to create.
    pub record_type: String,
    /// DNS record name to create.
    pub record_name: String,
    /// Acceptable record values.
    pub values: Vec<String>,
}

/// A domain that can be served over TLS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTlsDomain {
    /// The domain name, which doubles as its ID.
    pub id: TlsDomainId,
    /// Activations serving the domain.
    pub activations: Vec<TlsActivationId>,
    /// Certificates covering the domain.
    pub certificates: Vec<TlsCertificateId>,
    /// Subscriptions covering the domain.
    pub subscriptions: Vec<TlsSubscriptionId>,
}

impl JsonApiResource for CustomTlsDomain {
    const TYPE: &'static str = TLS_DOMAIN_TYPE;

    fn from_object(object: ResourceObject, _included: &Included) -> Result<Self> {
        Ok(Self {
            activations: object.related_ids("tls_activations"),
            certificates: object.related_ids("tls_certificates"),
            subscriptions: object.related_ids("tls_subscriptions"),
            id: TlsDomainId::from(object.id),
        })
    }
}

/// Input for listing one page of TLS subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTlsSubscriptionsInput {
    /// Only subscriptions in this state.
    pub filter_state: String,
    /// Only subscriptions covering this domain.
    pub filter_tls_domains_id: String,
    /// Comma-separated relationships to include.
    pub include: String,
    /// Page to fetch; `0` leaves the server default.
    pub page_number: u32,
    /// Records per page; `0` leaves the server default.
    pub page_size: u32,
    /// Sort field, prefixed with `-` for descending order.
    pub sort: String,
}

impl ListFilters for ListTlsSubscriptionsInput {
    fn filter_fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("filter[state]", (&self.filter_state).into()),
            ("filter[tls_domains.id]", (&self.filter_tls_domains_id).into()),
            ("include", (&self.include).into()),
            ("page[number]", self.page_number.into()),
            ("page[size]", self.page_size.into()),
            ("sort", (&self.sort).into()),
        ]
    }
}

/// Input for listing every TLS subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllTlsSubscriptionsInput {
    /// Only subscriptions in this state.
    pub filter_state: String,
    /// Only subscriptions covering this domain.
    pub filter_tls_domains_id: String,
    /// Comma-separated relationships to include.
    pub include: String,
    /// Sort field, prefixed with `-` for descending order.
    pub sort: String,
}

impl ListAllTlsSubscriptionsInput {
    /// Single-page input for the given page.
    #[must_use]
    pub fn page(&self, page_number: u32, page_size: u32) -> ListTlsSubscriptionsInput {
        ListTlsSubscriptionsInput {
            filter_state: self.filter_state.clone(),
            filter_tls_domains_id: self.filter_tls_domains_id.clone(),
            include: self.include.clone(),
            page_number,
            page_size,
            sort: self.sort.clone(),
        }
    }
}

/// Input for creating a TLS subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTlsSubscriptionInput {
    /// Certificate authority; empty leaves the server default.
    pub certificate_authority: String,
    /// TLS configuration to serve the certificate with; `None` uses the default.
    pub configuration: Option<TlsConfigurationId>,
    /// Domains to cover (at least one).
    pub domains: Vec<TlsDomainId>,
}

impl CreateTlsSubscriptionInput {
    /// Subscription covering the given domains.
    #[must_use]
    pub fn new<I, D>(domains: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TlsDomainId>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check that at least one domain is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] when `domains` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::TlsDomain));
        }
        Ok(())
    }

    pub(crate) fn attributes(&self) -> CreateSubscriptionAttributes<'_> {
        CreateSubscriptionAttributes {
            certificate_authority: &self.certificate_authority,
        }
    }

    pub(crate) fn relationships(&self) -> Vec<(&'static str, RelationshipData)> {
        let mut relationships = Vec::with_capacity(2);
        if let Some(configuration) = &self.configuration {
            relationships.push((
                "tls_configuration",
                RelationshipData::One(Some(ResourceIdentifier::new(
                    TLS_CONFIGURATION_TYPE,
                    configuration.as_str(),
                ))),
            ));
        }
        relationships.push((
            "tls_domains",
            RelationshipData::Many(
                self.domains
                    .iter()
                    .map(|domain| ResourceIdentifier::new(TLS_DOMAIN_TYPE, domain.as_str()))
                    .collect(),
            ),
        ));
        relationships
    }
}

#[derive(Serialize)]
pub(crate) struct CreateSubscriptionAttributes<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    certificate_authority: &'a str,
}

/// Input for fetching a TLS subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTlsSubscriptionInput {
    /// Subscription ID (required).
    pub id: TlsSubscriptionId,
    /// Comma-separated relationships to include, e.g. `tls_authorizations`.
    pub include: Option<String>,
}

impl GetTlsSubscriptionInput {
    /// Input for the given subscription.
    #[must_use]
    pub fn new(id: impl Into<TlsSubscriptionId>) -> Self {
        Self {
            id: id.into(),
            include: None,
        }
    }

    /// Also side-load the given relationships.
    #[must_use]
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }
}

/// Input for deleting a TLS subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTlsSubscriptionInput {
    /// Subscription ID (required).
    pub id: TlsSubscriptionId,
}

impl DeleteTlsSubscriptionInput {
    /// Input for the given subscription.
    #[must_use]
    pub fn new(id: impl Into<TlsSubscriptionId>) -> Self {
        Self { id: id.into() }
    }
}

/// Input for listing one page of custom TLS domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTlsDomainsInput {
    /// Only domains that are, or are not, in use.
    pub filter_in_use: Option<bool>,
    /// Only domains covered by this certificate.
    pub filter_tls_certificate_id: String,
    /// Only domains covered by this subscription.
    pub filter_tls_subscription_id: String,
    /// Comma-separated relationships to include.
    pub include: String,
    /// Page to fetch; `0` leaves the server default.
    pub page_number: u32,
    /// Records per page; `0` leaves the server default.
    pub page_size: u32,
    /// Sort field, prefixed with `-` for descending order.
    pub sort: String,
}

impl ListFilters for ListTlsDomainsInput {
    fn filter_fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("filter[in_use]", self.filter_in_use.into()),
            (
                "filter[tls_certificate.id]",
                (&self.filter_tls_certificate_id).into(),
            ),
            (
                "filter[tls_subscriptions.id]",
                (&self.filter_tls_subscription_id).into(),
            ),
            ("include", (&self.include).into()),
            ("page[number]", self.page_number.into()),
            ("page[size]", self.page_size.into()),
            ("sort", (&self.sort).into()),
        ]
    }
}

/// Input for listing every custom TLS domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllTlsDomainsInput {
    /// Only domains that are, or are not, in use.
    pub filter_in_use: Option<bool>,
    /// Only domains covered by this certificate.
    pub filter_tls_certificate_id: String,
    /// Only domains covered by this subscription.
    pub filter_tls_subscription_id: String,
    /// Comma-separated relationships to include.
    pub include: String,
    /// Sort field, prefixed with `-` for descending order.
    pub sort: String,
}

impl ListAllTlsDomainsInput {
    /// Single-page input for the given page.
    #[must_use]
    pub fn page(&self, page_number: u32, page_size: u32) -> ListTlsDomainsInput {
        ListTlsDomainsInput {
            filter_in_use: self.filter_in_use,
            filter_tls_certificate_id: self.filter_tls_certificate_id.clone(),
            filter_tls_subscription_id: self.filter_tls_subscription_id.clone(),
            include: self.include.clone(),
            page_number,
            page_size,
            sort: self.sort.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastly_core::jsonapi::encode_one;
    use serde_json::json;

    #[test]
    fn subscription_filters_omit_unset_fields() {
        let input = ListTlsSubscriptionsInput {
            filter_state: "pending".to_string(),
            page_size: 50,
            ..ListTlsSubscriptionsInput::default()
        };

        let params = input.format_filters();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("filter[state]"), Some("pending"));
        assert_eq!(params.get("page[size]"), Some("50"));
        assert_eq!(params.get("page[number]"), None);
    }

    #[test]
    fn domain_filters_encode_flag() {
        let input = ListTlsDomainsInput {
            filter_in_use: Some(false),
            filter_tls_subscription_id: "sub-1".to_string(),
            sort: "-created_at".to_string(),
            ..ListTlsDomainsInput::default()
        };

        let params = input.format_filters();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("filter[in_use]"), Some("false"));
        assert_eq!(params.get("filter[tls_subscriptions.id]"), Some("sub-1"));
        assert_eq!(params.get("sort"), Some("-created_at"));
        assert!(ListTlsDomainsInput::default().format_filters().is_empty());
    }

    #[test]
    fn list_all_inputs_carry_filters_into_each_page() {
        let all = ListAllTlsDomainsInput {
            filter_in_use: Some(true),
            include: "tls_activations".to_string(),
            ..ListAllTlsDomainsInput::default()
        };
        let page = all.page(3, 20);
        assert_eq!(page.filter_in_use, Some(true));
        assert_eq!(page.include, "tls_activations");
        assert_eq!(page.page_number, 3);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn create_requires_a_domain() {
        let input = CreateTlsSubscriptionInput::default();
        assert_eq!(
            input.validate(),
            Err(Error::MissingRequiredField(RequiredField::TlsDomain))
        );
        assert!(CreateTlsSubscriptionInput::new(["www.example.com"])
            .validate()
            .is_ok());
    }

    #[test]
    fn create_document_links_configuration_and_domains() {
        let input = CreateTlsSubscriptionInput {
            certificate_authority: "lets-encrypt".to_string(),
            configuration: Some(TlsConfigurationId::new("cfg-1")),
            ..CreateTlsSubscriptionInput::new(["a.example.com", "b.example.com"])
        };

        let document = encode_one(
            TLS_SUBSCRIPTION_TYPE,
            None,
            &input.attributes(),
            input.relationships(),
        )
        .unwrap();

        assert_eq!(
            document,
            json!({
                "data": {
                    "type": "tls_subscription",
                    "attributes": {"certificate_authority": "lets-encrypt"},
                    "relationships": {
                        "tls_configuration": {
                            "data": {"type": "tls_configuration", "id": "cfg-1"}
                        },
                        "tls_domains": {
                            "data": [
                                {"type": "tls_domain", "id": "a.example.com"},
                                {"type": "tls_domain", "id": "b.example.com"}
                            ]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn create_document_omits_unset_attributes() {
        let input = CreateTlsSubscriptionInput::new(["a.example.com"]);
        let document = encode_one(
            TLS_SUBSCRIPTION_TYPE,
            None,
            &input.attributes(),
            input.relationships(),
        )
        .unwrap();

        assert!(document["data"].get("attributes").is_none());
        assert!(document["data"]["relationships"]
            .get("tls_configuration")
            .is_none());
    }

    #[test]
    fn subscription_resolves_included_authorizations() {
        let object: ResourceObject = serde_json::from_value(json!({
            "id": "sub-1",
            "type": "tls_subscription",
            "attributes": {"certificate_authority": "lets-encrypt", "state": "pending"},
            "relationships": {
                "tls_authorizations": {"data": [
                    {"type": "tls_authorization", "id": "auth-1"},
                    {"type": "tls_authorization", "id": "auth-2"}
                ]},
                "tls_domains": {"data": [{"type": "tls_domain", "id": "www.example.com"}]},
                "tls_configuration": {"data": {"type": "tls_configuration", "id": "cfg-1"}},
                "tls_certificates": {"data": []}
            }
        }))
        .unwrap();
        let included = Included::new(vec![serde_json::from_value(json!({
            "id": "auth-1",
            "type": "tls_authorization",
            "attributes": {
                "state": "pending",
                "challenges": [{
                    "type": "managed-dns",
                    "record_type": "CNAME",
                    "record_name": "_acme-challenge.www.example.com",
                    "values": ["abc.fastly-validations.com"]
                }]
            }
        }))
        .unwrap()]);

        let subscription = TlsSubscription::from_object(object, &included).unwrap();
        assert_eq!(subscription.id.as_str(), "sub-1");
        assert_eq!(subscription.state, "pending");
        assert_eq!(
            subscription.configuration,
            Some(TlsConfigurationId::new("cfg-1"))
        );
        assert_eq!(subscription.domains, vec![TlsDomainId::new("www.example.com")]);
        assert!(subscription.certificates.is_empty());

        assert_eq!(subscription.authorizations.len(), 2);
        let resolved = &subscription.authorizations[0];
        assert_eq!(resolved.state, "pending");
        assert_eq!(resolved.challenges[0].kind, "managed-dns");
        assert_eq!(resolved.challenges[0].record_type, "CNAME");
        // Not side-loaded: only the id is known.
        let bare = &subscription.authorizations[1];
        assert_eq!(bare.id.as_str(), "auth-2");
        assert!(bare.challenges.is_empty());
    }

    #[test]
    fn null_attributes_decode_as_defaults() {
        let object: ResourceObject = serde_json::from_value(json!({
            "id": "sub-2",
            "type": "tls_subscription",
            "attributes": {
                "certificate_authority": null,
                "state": "pending",
                "created_at": null
            },
            "relationships": {
                "tls_authorizations": {"data": [{"type": "tls_authorization", "id": "auth-1"}]}
            }
        }))
        .unwrap();
        let included = Included::new(vec![serde_json::from_value(json!({
            "id": "auth-1",
            "type": "tls_authorization",
            "attributes": {
                "state": null,
                "challenges": [{
                    "type": "managed-dns",
                    "record_type": "CNAME",
                    "record_name": null,
                    "values": null
                }]
            }
        }))
        .unwrap()]);

        let subscription = TlsSubscription::from_object(object, &included).unwrap();
        assert!(subscription.certificate_authority.is_empty());
        assert!(subscription.created_at.is_none());

        let authorization = &subscription.authorizations[0];
        assert!(authorization.state.is_empty());
        assert!(authorization.challenges[0].record_name.is_empty());
        assert!(authorization.challenges[0].values.is_empty());
    }

    #[test]
    fn domain_reads_relationship_ids() {
        let object: ResourceObject = serde_json::from_value(json!({
            "id": "www.example.com",
            "type": "tls_domain",
            "relationships": {
                "tls_activations": {"data": [{"type": "tls_activation", "id": "act-1"}]},
                "tls_subscriptions": {"data": [{"type": "tls_subscription", "id": "sub-1"}]}
            }
        }))
        .unwrap();

        let domain = CustomTlsDomain::from_object(object, &Included::default()).unwrap();
        assert_eq!(domain.id.as_str(), "www.example.com");
        assert_eq!(domain.activations, vec![TlsActivationId::new("act-1")]);
        assert!(domain.certificates.is_empty());
        assert_eq!(domain.subscriptions, vec![TlsSubscriptionId::new("sub-1")]);
    }
}
