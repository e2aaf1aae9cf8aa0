//! Physical path to public URL rewriting
//!
//! Stored paths are absolute and OS-specific (drive letters, backslashes,
//! arbitrary parent directories). Everything up to and including the first
//! `data` segment is discarded and the remainder is exposed under the fixed
//! `/raw/` namespace served by the static file front-end.

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Directory segment marking the root of the served data tree
pub const DATA_MARKER: &str = "data";

/// Public namespace the data tree is mounted under
pub const VIRTUAL_PREFIX: &str = "/raw/";

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://nginx";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Path does not contain 'data' directory: {path}")]
pub struct InvalidPathError {
    pub path: String,
}

// ============================================================================
// Rewriter
// ============================================================================

/// Rewrites stored physical paths into absolute public URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewriter {
    base_url: String,
}

impl Default for PathRewriter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PathRewriter {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uses `base_url` when given, the process default otherwise
    pub fn with_optional_base(base_url: Option<&str>) -> Self {
        base_url.map(Self::new).unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the complete public URL for a stored path.
    pub fn rewrite(&self, physical_path: &str) -> Result<String, InvalidPathError> {
        let url_path = public_url_path(physical_path)?;
        Ok(format!("{}{}", self.base_url, url_path))
    }
}

/// Convert a stored path into its `/raw/...` URL path.
///
/// `C:\Users\x\data\YEP6\file.png` becomes `/raw/YEP6/file.png`. Each
/// segment is percent-encoded on its own so reserved characters inside a
/// file name never merge across segment boundaries.
pub fn public_url_path(physical_path: &str) -> Result<String, InvalidPathError> {
    let normalized = physical_path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').collect();

    let marker = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case(DATA_MARKER))
        .ok_or_else(|| InvalidPathError {
            path: physical_path.to_string(),
        })?;

    let encoded: Vec<String> = segments
        .iter()
        .skip(marker + 1)
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();

    Ok(format!("{}{}", VIRTUAL_PREFIX, encoded.join("/")))
}
