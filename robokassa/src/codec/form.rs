//! `application/x-www-form-urlencoded` payloads.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Content type declared on every gateway request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered form payload.
///
/// Keys are kept sorted so the encoded output is deterministic. The same payload
/// serves as POST body and as GET query string.
///
/// # Examples
///
/// ```
/// use robokassa::codec::FormPayload;
///
/// let mut form = FormPayload::new();
/// form.insert("OutSum", "100").insert("Description", "Order #1");
///
/// assert_eq!(form.encode(), "Description=Order+%231&OutSum=100");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: BTreeMap<&'static str, String>,
}

impl FormPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key, value.into());
        self
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns `true` if the field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the field names in encoding order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Returns `(name, value)` pairs in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes the payload with keys in sorted order.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// Percent-encodes a single value with form rules (space becomes `+`).
#[must_use]
pub fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Reverses [`encode_value`].
#[must_use]
pub fn decode_value(encoded: &str) -> String {
    // An escaped value has no `&` or `=`, so it parses as a single bare key.
    form_urlencoded::parse(encoded.as_bytes()).map(|(key, _)| key).collect()
}
