//! Alias Resolver
//!
//! Turns aliases and tag filters into public file URLs:
//! - single lookup: exactly one alias, not-found is an error
//! - batch lookup: partial success, misses and bad records go to `not_found`
//! - tag search: AND of substring matches, paginated, with a pre-page total
//!
//! Each call opens its own store session and drops it before returning, so a
//! resolver can be shared freely between concurrent requests.

use crate::db::{AliasStore, TagFilter};
use dataset_core::{
    BatchResult, ErrorCode, InvalidPathError, PathRewriter, QueryError, ResolvedFile,
    ServiceConfig, TagQuery, TagSearchResult,
};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Alias not found: {alias}")]
    NotFound { alias: String },

    #[error("Batch size {size} exceeds maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("Stored path for alias {alias} cannot be served: {source}")]
    DataDefect {
        alias: String,
        #[source]
        source: InvalidPathError,
    },

    #[error("Alias store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Resolver task failed: {0}")]
    Worker(String),
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::NotFound { .. } => ErrorCode::NotFound,
            ResolveError::BatchTooLarge { .. } => ErrorCode::BatchTooLarge,
            ResolveError::InvalidQuery(QueryError::NoTagsProvided) => ErrorCode::NoTagsProvided,
            ResolveError::InvalidQuery(QueryError::LimitOutOfRange { .. }) => {
                ErrorCode::InvalidPagination
            }
            ResolveError::DataDefect { .. } => ErrorCode::DataDefect,
            ResolveError::Store(_) | ResolveError::Worker(_) => ErrorCode::Internal,
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Debug, Clone)]
pub struct AliasResolver {
    store: AliasStore,
    rewriter: PathRewriter,
    max_batch_size: usize,
}

impl AliasResolver {
    pub fn new(store: AliasStore, rewriter: PathRewriter, max_batch_size: usize) -> Self {
        Self {
            store,
            rewriter,
            max_batch_size,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            AliasStore::new(&config.database_path),
            PathRewriter::new(&config.base_url),
            config.max_batch_size,
        )
    }

    /// Same store and limits, different public base URL
    pub fn with_base_url(&self, base_url: &str) -> Self {
        Self {
            rewriter: PathRewriter::new(base_url),
            ..self.clone()
        }
    }

    pub fn store(&self) -> &AliasStore {
        &self.store
    }

    pub fn rewriter(&self) -> &PathRewriter {
        &self.rewriter
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Resolve one alias to its public URL.
    pub fn resolve(&self, alias: &str) -> Result<ResolvedFile, ResolveError> {
        tracing::info!("Searching for alias: {}", alias);

        let session = self.store.session()?;
        let Some(physical_path) = session.find_path(alias)? else {
            tracing::warn!("Alias not found: {}", alias);
            return Err(ResolveError::NotFound {
                alias: alias.to_string(),
            });
        };

        let url = self.rewriter.rewrite(&physical_path).map_err(|source| {
            tracing::error!(
                "Error converting path for alias {}: {} (path: {:?})",
                alias,
                source,
                physical_path
            );
            ResolveError::DataDefect {
                alias: alias.to_string(),
                source,
            }
        })?;

        tracing::info!("Found alias {}: {}", alias, url);
        Ok(ResolvedFile {
            alias: alias.to_string(),
            url,
        })
    }

    /// Resolve many aliases in one store session.
    ///
    /// Only the size check can fail the whole call. Unknown aliases and
    /// records whose path cannot be rewritten land in `not_found`; both
    /// output lists keep the caller's order.
    pub fn resolve_batch(&self, aliases: &[String]) -> Result<BatchResult, ResolveError> {
        if aliases.len() > self.max_batch_size {
            return Err(ResolveError::BatchTooLarge {
                size: aliases.len(),
                max: self.max_batch_size,
            });
        }

        let mut batch = BatchResult::default();
        if aliases.is_empty() {
            return Ok(batch);
        }

        tracing::info!("Batch search for {} aliases", aliases.len());

        let found_map = {
            let session = self.store.session()?;
            session.find_paths(aliases)?
        };

        for alias in aliases {
            let Some(physical_path) = found_map.get(alias) else {
                batch.push_missing(alias);
                continue;
            };
            match self.rewriter.rewrite(physical_path) {
                Ok(url) => batch.push_found(alias, url),
                Err(e) => {
                    tracing::error!(
                        "Error converting path for alias {}: {} (path: {:?})",
                        alias,
                        e,
                        physical_path
                    );
                    batch.push_missing(alias);
                }
            }
        }

        tracing::info!(
            "Batch search complete: {} found, {} not found",
            batch.found.len(),
            batch.not_found.len()
        );
        Ok(batch)
    }

    /// Tag search from raw inputs; blank tags are discarded before validation.
    pub fn search_by_tags<S: AsRef<str>>(
        &self,
        tags: &[S],
        offset: u64,
        limit: u32,
    ) -> Result<TagSearchResult, ResolveError> {
        let query = TagQuery::new(tags, offset, limit)?;
        self.search(&query)
    }

    /// Run a validated tag search.
    ///
    /// `total_count` covers every matching record. Page records whose path
    /// cannot be rewritten are dropped, so a page may hold fewer than
    /// `limit` results even when more matches exist.
    pub fn search(&self, query: &TagQuery) -> Result<TagSearchResult, ResolveError> {
        tracing::info!(
            "Tag search for: {:?}, offset={}, limit={}",
            query.tags(),
            query.offset(),
            query.limit()
        );

        let filter = TagFilter::new(query.tags());
        let (total_count, records) = {
            let session = self.store.session()?;
            let total = session.count_tagged(&filter)?;
            let page = session.page_tagged(&filter, query.offset(), query.limit())?;
            (total, page)
        };

        let results: Vec<ResolvedFile> = records
            .into_iter()
            .filter_map(|record| match self.rewriter.rewrite(&record.physical_path) {
                Ok(url) => Some(ResolvedFile {
                    alias: record.alias,
                    url,
                }),
                Err(e) => {
                    tracing::error!(
                        "Error converting path for alias {}: {} (path: {:?})",
                        record.alias,
                        e,
                        record.physical_path
                    );
                    None
                }
            })
            .collect();

        tracing::info!(
            "Tag search complete: {} results, {} total",
            results.len(),
            total_count
        );
        Ok(TagSearchResult {
            results,
            total_count,
        })
    }
}
