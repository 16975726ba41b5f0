use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use time::OffsetDateTime;

/// Position of a document in the engine's arena, assigned in insertion order.
pub type DocId = usize;

/// A starred repository as supplied by the fetch layer. The engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub stargazer_count: u64,
    #[serde(default)]
    pub fork_count: u64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub pushed_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starred_at: Option<OffsetDateTime>,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            description: None,
            readme: None,
            stargazer_count: 0,
            fork_count: 0,
            pushed_at: None,
            updated_at: None,
            starred_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }

    /// The `owner/name` key documents are stored under.
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Text of a field, empty when the field is absent.
    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Owner => &self.owner,
            Field::Name => &self.name,
            Field::Description => self.description.as_deref().unwrap_or(""),
            Field::Readme => self.readme.as_deref().unwrap_or(""),
        }
    }
}

/// Indexed repository attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Owner,
    Name,
    Description,
    Readme,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Owner, Field::Name, Field::Description, Field::Readme];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Owner => "owner",
            Field::Name => "name",
            Field::Description => "description",
            Field::Readme => "readme",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward-store entry for one repository.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub id: String,
    pub repository: Repository,
    /// Weighted occurrence counts accumulated at ingestion. Never rewritten.
    pub term_frequency: HashMap<String, f64>,
    /// Per-token BM25+ contributions, rebuilt from `term_frequency` on every consolidation.
    pub scores: HashMap<String, f64>,
    /// Weighted token count across all ingested fields.
    pub length: f64,
}

impl Document {
    pub(crate) fn new(id: String, repository: Repository) -> Self {
        Self { id, repository, term_frequency: HashMap::new(), scores: HashMap::new(), length: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of hits. Zero is treated as one.
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

/// One ranked result. Borrows the repository from the engine rather than copying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    pub id: &'a str,
    pub repository: &'a Repository,
    pub score: f64,
    /// Query tokens found in this document, in query order.
    pub matched_tokens: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    pub total_length: f64,
    pub average_length: f64,
    pub consolidated: bool,
}
