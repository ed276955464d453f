//! JSON:API document decoding and encoding.
//!
//! Fastly's TLS and WAF endpoints speak JSON:API. Responses carry the primary
//! `data` (one resource object or an array of them), optional side-loaded
//! `included` objects, and for collections a `links`/`meta` pair describing
//! pagination. Resource models implement [`JsonApiResource`] to be built from
//! a [`ResourceObject`].

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Media type that must be sent as `Accept` for filters and `include` to be honoured.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// A `{type, id}` pair pointing at another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Resource type
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource id
    pub id: String,
}

impl ResourceIdentifier {
    /// Create an identifier.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Linkage carried in a relationship's `data` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-many linkage
    Many(Vec<ResourceIdentifier>),
    /// To-one linkage, possibly empty
    One(Option<ResourceIdentifier>),
}

impl Default for RelationshipData {
    fn default() -> Self {
        Self::One(None)
    }
}

impl RelationshipData {
    /// All identifiers in the linkage.
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            Self::Many(ids) => ids,
            Self::One(Some(id)) => std::slice::from_ref(id),
            Self::One(None) => &[],
        }
    }
}

/// A relationship member of a resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Resource linkage
    #[serde(default)]
    pub data: RelationshipData,
}

/// A resource object as it appears in `data` or `included`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceObject {
    /// Resource id
    #[serde(default)]
    pub id: String,
    /// Resource type
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute members
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    /// Relationship members by name
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl ResourceObject {
    /// Fail with [`Error::UnexpectedResponseType`] unless the object has the given type.
    ///
    /// # Errors
    ///
    /// Returns an error when the `type` member differs from `expected`.
    pub fn expect_type(&self, expected: &'static str) -> Result<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedResponseType {
                expected,
                found: self.kind.clone(),
            })
        }
    }

    /// Deserialize the attribute members into `A`.
    ///
    /// Members sent as `null`, including those of nested objects, are
    /// dropped first so they take the field's default like absent ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeError`] if the attributes do not fit `A`.
    pub fn attributes<A>(&self) -> Result<A>
    where
        A: DeserializeOwned,
    {
        let members = without_nulls(Value::Object(self.attributes.clone()));
        serde_json::from_value(members).map_err(|err| {
            Error::DecodeError(format!(
                "invalid attributes for `{}` {}: {err}",
                self.kind, self.id
            ))
        })
    }

    /// Identifiers linked through the named relationship.
    #[must_use]
    pub fn related(&self, name: &str) -> &[ResourceIdentifier] {
        self.relationships
            .get(name)
            .map(|relationship| relationship.data.identifiers())
            .unwrap_or(&[])
    }

    /// Ids linked through the named relationship, converted to `T`.
    #[must_use]
    pub fn related_ids<T>(&self, name: &str) -> Vec<T>
    where
        T: From<String>,
    {
        self.related(name)
            .iter()
            .map(|identifier| T::from(identifier.id.clone()))
            .collect()
    }

    /// The single id linked through a to-one relationship, if any.
    #[must_use]
    pub fn related_id<T>(&self, name: &str) -> Option<T>
    where
        T: From<String>,
    {
        self.related(name)
            .first()
            .map(|identifier| T::from(identifier.id.clone()))
    }
}

/// Side-loaded resource objects from a document's `included` member.
#[derive(Debug, Clone, Default)]
pub struct Included {
    objects: Vec<ResourceObject>,
}

impl Included {
    /// Wrap a list of included objects.
    #[must_use]
    pub fn new(objects: Vec<ResourceObject>) -> Self {
        Self { objects }
    }

    /// Find an included object by type and id.
    #[must_use]
    pub fn find(&self, kind: &str, id: &str) -> Option<&ResourceObject> {
        self.objects
            .iter()
            .find(|object| object.kind == kind && object.id == id)
    }

    /// Build the included resource `R` with the given id, if it was side-loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the included object cannot be converted into `R`.
    pub fn resolve<R>(&self, id: &str) -> Result<Option<R>>
    where
        R: JsonApiResource,
    {
        self.find(R::TYPE, id)
            .map(|object| R::from_object(object.clone(), self))
            .transpose()
    }

    /// Number of included objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true when nothing was side-loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A resource model that can be built from a JSON:API resource object.
pub trait JsonApiResource: Sized {
    /// The JSON:API `type` of the resource.
    const TYPE: &'static str;

    /// Build the model from its resource object.
    ///
    /// The object's type has already been checked against [`Self::TYPE`].
    ///
    /// # Errors
    ///
    /// Returns an error if attributes or relationships are malformed.
    fn from_object(object: ResourceObject, included: &Included) -> Result<Self>;
}

/// Pagination links of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// First page
    #[serde(default, deserialize_with = "empty_as_none")]
    pub first: Option<String>,
    /// Last page
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last: Option<String>,
    /// Previous page
    #[serde(default, deserialize_with = "empty_as_none")]
    pub prev: Option<String>,
    /// Next page; absent on the final page
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next: Option<String>,
}

/// Pagination counters of a collection response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Page that was returned
    #[serde(default)]
    pub current_page: u32,
    /// Page size the server applied
    #[serde(default)]
    pub per_page: u32,
    /// Total records across all pages
    #[serde(default)]
    pub record_count: u64,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: u32,
}

/// Pagination envelope of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Links section
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: PaginationLinks,
    /// Meta section
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PaginationMeta,
}

impl PaginationInfo {
    /// Locator of the next page, if the server reported one.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.links.next.as_deref()
    }

    /// Returns true when the server reported a next page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.links.next.is_some()
    }
}

#[derive(Deserialize)]
struct Document<D> {
    data: D,
    #[serde(default, deserialize_with = "null_as_default")]
    included: Vec<ResourceObject>,
    #[serde(default, deserialize_with = "null_as_default")]
    links: PaginationLinks,
    #[serde(default, deserialize_with = "null_as_default")]
    meta: PaginationMeta,
}

fn parse_document<D>(body: &[u8]) -> Result<Document<D>>
where
    D: DeserializeOwned,
{
    serde_json::from_slice(body)
        .map_err(|err| Error::DecodeError(format!("invalid JSON:API document: {err}")))
}

/// Decode a single-resource document into `R`.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] for a malformed body and
/// [`Error::UnexpectedResponseType`] when `data` is not an `R`.
pub fn decode_one<R>(body: &[u8]) -> Result<R>
where
    R: JsonApiResource,
{
    let document: Document<ResourceObject> = parse_document(body)?;
    let included = Included::new(document.included);
    document.data.expect_type(R::TYPE)?;
    R::from_object(document.data, &included)
}

/// Decode a collection document into its resources and pagination envelope.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] for a malformed body and
/// [`Error::UnexpectedResponseType`] when any item is not an `R`.
pub fn decode_many<R>(body: &[u8]) -> Result<(Vec<R>, PaginationInfo)>
where
    R: JsonApiResource,
{
    let document: Document<Vec<ResourceObject>> = parse_document(body)?;
    let included = Included::new(document.included);

    let items = document
        .data
        .into_iter()
        .map(|object| {
            object.expect_type(R::TYPE)?;
            R::from_object(object, &included)
        })
        .collect::<Result<Vec<_>>>()?;

    let info = PaginationInfo {
        links: document.links,
        meta: document.meta,
    };
    Ok((items, info))
}

/// Build a single-resource request document.
///
/// `attributes` must serialize to a JSON object; an empty `id` is left out.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if the attributes cannot be serialized.
pub fn encode_one<A>(
    kind: &str,
    id: Option<&str>,
    attributes: &A,
    relationships: Vec<(&str, RelationshipData)>,
) -> Result<Value>
where
    A: Serialize + ?Sized,
{
    let mut data = Map::new();
    data.insert("type".to_string(), Value::String(kind.to_string()));
    if let Some(id) = id.filter(|id| !id.is_empty()) {
        data.insert("id".to_string(), Value::String(id.to_string()));
    }

    let attributes = serde_json::to_value(attributes)?;
    if attributes.as_object().is_some_and(|map| !map.is_empty()) {
        data.insert("attributes".to_string(), attributes);
    }

    if !relationships.is_empty() {
        let mut members = Map::new();
        for (name, linkage) in relationships {
            let relationship = serde_json::to_value(Relationship { data: linkage })?;
            members.insert(name.to_string(), relationship);
        }
        data.insert("relationships".to_string(), Value::Object(members));
    }

    let mut document = Map::new();
    document.insert("data".to_string(), Value::Object(data));
    Ok(Value::Object(document))
}

fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .into_iter()
                .filter(|(_, member)| !member.is_null())
                .map(|(name, member)| (name, without_nulls(member)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(without_nulls).collect()),
        other => other,
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|link| !link.is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
