//! Conversion of list inputs into query parameters.
//!
//! Every list input describes its filters as a fixed table of
//! `(parameter name, value)` entries. A value that holds its zero value
//! (empty string, `0`, `None`) is left out of the query entirely, so a caller
//! cannot ask for a literal `0` page number or page size.

/// Typed value of one filter table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue<'a> {
    /// Sent as-is when non-empty.
    Text(&'a str),
    /// Sent in base 10 when non-zero.
    Number(u32),
    /// Sent as `true`/`false` when present.
    Flag(Option<bool>),
}

impl FilterValue<'_> {
    /// Returns true when the value means "not set".
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::Number(value) => *value == 0,
            Self::Flag(value) => value.is_none(),
        }
    }

    /// Encode the value, or `None` when it is not set.
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        if self.is_zero() {
            return None;
        }
        match self {
            Self::Text(value) => Some((*value).to_string()),
            Self::Number(value) => Some(value.to_string()),
            Self::Flag(value) => value.map(|flag| flag.to_string()),
        }
    }
}

impl<'a> From<&'a str> for FilterValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for FilterValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<u32> for FilterValue<'_> {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

impl From<Option<bool>> for FilterValue<'_> {
    fn from(value: Option<bool>) -> Self {
        Self::Flag(value)
    }
}

/// A list input whose fields map onto query parameters.
pub trait ListFilters {
    /// The formatting table, in the order parameters are emitted.
    fn filter_fields(&self) -> Vec<(&'static str, FilterValue<'_>)>;

    /// Format the set fields as query parameters.
    fn format_filters(&self) -> QueryParams {
        let mut params = QueryParams::new();
        for (key, value) in self.filter_fields() {
            params.push_filter(key, value);
        }
        params
    }
}

/// Builder for assembling query parameter pairs.
///
/// Keys are unique: pushing an existing key replaces its value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a filter value unless it holds its zero value.
    pub fn push_filter(&mut self, key: &'static str, value: FilterValue<'_>) {
        if let Some(encoded) = value.encode() {
            self.insert(key, encoded);
        }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: ToString,
    {
        self.insert(key, value.to_string());
    }

    fn insert(&mut self, key: &'static str, value: String) {
        if let Some(existing) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.pairs.push((key, value));
        }
    }

    /// Look up the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PageInput {
        page_size: u32,
        page_number: u32,
        include: String,
        in_use: Option<bool>,
    }

    impl ListFilters for PageInput {
        fn filter_fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
            vec![
                ("page[size]", self.page_size.into()),
                ("page[number]", self.page_number.into()),
                ("include", (&self.include).into()),
                ("filter[in_use]", self.in_use.into()),
            ]
        }
    }

    #[test]
    fn zero_values_are_omitted() {
        let input = PageInput {
            page_size: 0,
            page_number: 0,
            include: String::new(),
            in_use: None,
        };
        assert!(input.format_filters().is_empty());
    }

    #[test]
    fn set_values_are_encoded() {
        let input = PageInput {
            page_size: 2,
            page_number: 2,
            include: "included".to_string(),
            in_use: Some(false),
        };

        let params = input.format_filters();
        assert_eq!(
            params.into_pairs(),
            vec![
                ("page[size]", "2".to_string()),
                ("page[number]", "2".to_string()),
                ("include", "included".to_string()),
                ("filter[in_use]", "false".to_string()),
            ]
        );
    }

    #[test]
    fn flag_true_is_encoded() {
        assert_eq!(FilterValue::Flag(Some(true)).encode().as_deref(), Some("true"));
        assert_eq!(FilterValue::Flag(None).encode(), None);
    }

    #[test]
    fn push_replaces_existing_key() {
        let mut params = QueryParams::new();
        params.push("page[number]", 1);
        params.push("page[number]", 2);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page[number]"), Some("2"));
    }

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("include", Option::<String>::None);
        assert!(params.is_empty());
    }
}
