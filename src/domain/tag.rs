use serde::{Deserialize, Serialize};
use std::fmt;

pub const TAGS_PATH: &str = "/resources/tags";

/// A `key:value` tag as the tag service stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses `key:value` text, splitting at the first colon. A missing value
    /// is allowed, an empty key is not.
    pub fn parse(text: &str) -> Option<Self> {
        let (key, value) = match text.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (text.trim(), ""),
        };
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value))
    }

    /// Query filter selecting this exact tag in the tag collection.
    pub fn store_filter(&self) -> String {
        format!(
            "key eq '{}' and value eq '{}'",
            escape_filter_value(&self.key),
            escape_filter_value(&self.value)
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

fn escape_filter_value(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Ordered set of tag document links.
///
/// Insertion order is kept for display and duplicates are never stored. A
/// payload that carries duplicates keeps the first occurrence of each link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Vec<String>")]
pub struct TagLinkSet {
    links: Vec<String>,
}

impl TagLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.iter().any(|l| l == link)
    }

    /// Appends `link` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if link.is_empty() || self.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Removes every occurrence of `link`. Returns how many entries went away.
    pub fn remove_all(&mut self, link: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| l != link);
        before - self.links.len()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }
}

impl From<Vec<String>> for TagLinkSet {
    fn from(links: Vec<String>) -> Self {
        let mut set = TagLinkSet::new();
        for link in links {
            set.insert(link);
        }
        set
    }
}

impl From<Option<Vec<String>>> for TagLinkSet {
    fn from(links: Option<Vec<String>>) -> Self {
        links.map(TagLinkSet::from).unwrap_or_default()
    }
}

impl From<TagLinkSet> for Vec<String> {
    fn from(set: TagLinkSet) -> Self {
        set.links
    }
}

impl<'a> IntoIterator for &'a TagLinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

/// Request body of the tag assignment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssignmentRequest {
    pub resource_link: String,
    #[serde(default)]
    pub tags_to_assign: Vec<Tag>,
    #[serde(default)]
    pub tags_to_unassign: Vec<Tag>,
}
