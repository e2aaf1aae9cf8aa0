//! Records read from the alias store and the results built from them

use serde::{Deserialize, Serialize};

/// One row of the alias table, as written by the ingestion process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub alias: String,
    pub physical_path: String,
    #[serde(default)]
    pub tags: String,
}

/// An alias paired with its public URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub alias: String,
    pub url: String,
}

/// Outcome of a batch lookup.
///
/// Both lists follow the order of the requested aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "results")]
    pub found: Vec<ResolvedFile>,
    pub not_found: Vec<String>,
}

impl BatchResult {
    pub fn push_found(&mut self, alias: &str, url: String) {
        self.found.push(ResolvedFile {
            alias: alias.to_string(),
            url,
        });
    }

    pub fn push_missing(&mut self, alias: &str) {
        self.not_found.push(alias.to_string());
    }
}

/// One page of a tag search.
///
/// `total_count` counts every matching record, before pagination and
/// regardless of whether a record's path could be rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSearchResult {
    pub results: Vec<ResolvedFile>,
    pub total_count: u64,
}
