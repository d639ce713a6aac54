//! Request parameters: query strings, form bodies, header overrides and
//! multipart parts.

use std::fmt;

use serde::ser::{Serialize, Serializer};

/// Content type attached to every call that carries a URL-encoded body.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An insertion-ordered map of string keys to string values.
///
/// Keys are unique: inserting an existing key replaces its value in place.
/// Values are rendered with [`ToString`], so `true` becomes `"true"` and
/// integers are written in decimal.
///
/// # Example
///
/// ```
/// use backlog_api::Params;
///
/// let params = Params::new()
///     .with("projectId", 5)
///     .with("summary", "Broken build")
///     .with("projectId", 6);
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params.get("projectId"), Some("6"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

/// Header overrides share the parameter map shape.
pub type Headers = Params;

impl Params {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers for calls that send a URL-encoded form body.
    #[must_use]
    pub fn form_headers() -> Headers {
        Self::new().with("Content-Type", FORM_URLENCODED)
    }

    /// Builder form of [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any existing value for the key.
    ///
    /// Returns the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Ordered merge: `defaults` first, then `overrides` applied on top.
    ///
    /// A key present in both keeps its default position but takes the
    /// override's value. Keys only in `overrides` are appended in order.
    #[must_use]
    pub fn merge(defaults: Params, overrides: Params) -> Params {
        let mut merged = defaults;
        for (key, value) in overrides.entries {
            merged.insert(key, value);
        }
        merged
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value by key, ignoring ASCII case. Used for header names.
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as key/value pairs, ready for URL encoding.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Serializes as a sequence of `(key, value)` pairs, the shape URL
/// encoders expect.
impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Content of one multipart part.
#[derive(Clone, PartialEq, Eq)]
pub enum PartBody {
    /// A plain text field.
    Text(String),
    /// A file upload.
    File {
        file_name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

impl fmt::Debug for PartBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::File {
                file_name,
                bytes,
                mime,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("len", &bytes.len())
                .field("mime", mime)
                .finish(),
        }
    }
}

/// A named multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// An ordered list of multipart/form-data parts.
///
/// Unlike [`Params`], names may repeat (`attachmentId[]` is sent once per id).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipart {
    parts: Vec<Part>,
}

impl Multipart {
    /// Create an empty part list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text part.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::Text(value.to_string()),
        });
        self
    }

    /// Append a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::File {
                file_name: file_name.into(),
                bytes: bytes.into(),
                mime: mime.map(str::to_string),
            },
        });
        self
    }

    /// The parts in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns true if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<&Params> for Multipart {
    fn from(params: &Params) -> Self {
        params
            .iter()
            .fold(Multipart::new(), |form, (key, value)| form.text(key, value))
    }
}

impl IntoIterator for Multipart {
    type Item = Part;
    type IntoIter = std::vec::IntoIter<Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}
