/// Error taxonomy shared by every transport
/// Stable codes let clients branch without parsing messages
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    BatchTooLarge,
    NoTagsProvided,
    InvalidPagination,
    InvalidRequest,
    DataDefect,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::BatchTooLarge => "batch_too_large",
            ErrorCode::NoTagsProvided => "no_tags_provided",
            ErrorCode::InvalidPagination => "invalid_pagination",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::DataDefect => "data_defect",
            ErrorCode::Internal => "internal",
        }
    }

    /// Client-side errors are fixed by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound
                | ErrorCode::BatchTooLarge
                | ErrorCode::NoTagsProvided
                | ErrorCode::InvalidPagination
                | ErrorCode::InvalidRequest
        )
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    pub code: ErrorCode,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, detail: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            code,
        }
    }
}
