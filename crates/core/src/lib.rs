//! Dataset Core
//!
//! Transport- and storage-independent pieces of the alias service: path
//! rewriting, result types, tag query validation and configuration.

pub mod config;
pub mod error;
pub mod model;
pub mod path_rewrite;
pub mod query;

pub use config::{ConfigError, ServiceConfig};
pub use error::{ErrorBody, ErrorCode};
pub use model::{AliasRecord, BatchResult, ResolvedFile, TagSearchResult};
pub use path_rewrite::{public_url_path, InvalidPathError, PathRewriter, DEFAULT_BASE_URL};
pub use query::{parse_tag_params, QueryError, TagQuery, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
