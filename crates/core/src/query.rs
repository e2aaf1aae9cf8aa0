//! Tag search input parsing and validation

use thiserror::Error;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Largest page a single tag search may return
pub const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("At least one tag must be provided")]
    NoTagsProvided,

    #[error("limit must be between 1 and 1000, got {limit}")]
    LimitOutOfRange { limit: u32 },
}

/// Collect the tag list from the two accepted input forms.
///
/// A comma-joined `tags` value wins over a single `tag`. Entries are trimmed
/// and blanks dropped, so `"cat, ,red"` yields `["cat", "red"]`.
pub fn parse_tag_params(tag: Option<&str>, tags: Option<&str>) -> Vec<String> {
    match (tags.filter(|t| !t.is_empty()), tag) {
        (Some(joined), _) => normalize_tags(joined.split(',')),
        (None, Some(single)) => normalize_tags(std::iter::once(single)),
        (None, None) => Vec::new(),
    }
}

fn normalize_tags<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A validated tag search: at least one non-blank tag and a bounded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    tags: Vec<String>,
    offset: u64,
    limit: u32,
}

impl TagQuery {
    pub fn new<I, S>(tags: I, offset: u64, limit: u32) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(QueryError::LimitOutOfRange { limit });
        }
        if tags.is_empty() {
            return Err(QueryError::NoTagsProvided);
        }

        Ok(Self {
            tags,
            offset,
            limit,
        })
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}
