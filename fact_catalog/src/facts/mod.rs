//! Fact definitions - the records shown to the user.

use serde::{Deserialize, Serialize};

/// Unique identifier for facts.
///
/// Identifiers come from the fact data itself, so they are plain strings
/// rather than generated ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub String);

impl FactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labelled link to further reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLink {
    pub title: String,
    pub url: String,
}

impl FactLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A single educational fact.
///
/// Field names follow the camelCase layout of the JSON fact files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: FactId,

    /// Headline shown in the notification.
    pub title: String,

    /// One-line summary shown next to the title.
    pub short_description: String,

    /// Long-form explanation for the detail view.
    pub detailed_description: String,

    /// Code snippets, in display order. Absent in the data means empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    /// Further reading, in display order. Absent in the data means empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<FactLink>,
}

impl Fact {
    /// Create a new fact with the given id and title.
    pub fn new(id: impl Into<FactId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: String::new(),
            detailed_description: String::new(),
            examples: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Set the short description.
    pub fn with_short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    /// Set the detailed description.
    pub fn with_detailed_description(mut self, text: impl Into<String>) -> Self {
        self.detailed_description = text.into();
        self
    }

    /// Append a code example.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Append a link.
    pub fn with_link(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.push(FactLink::new(title, url));
        self
    }

    pub fn has_examples(&self) -> bool {
        !self.examples.is_empty()
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }
}
