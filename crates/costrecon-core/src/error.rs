//! Error types for costrecon-core
//!
//! Two layers: `SourceError` categorizes remote data-source failures so the
//! aggregation layer can decide what is recoverable, and `ReportError` covers
//! the few failures that abort an entire report run.

use thiserror::Error;

/// Categorized failure from the remote cost/usage data source.
///
/// The aggregation layer maps these to scoped warning strings; only the
/// selected month's primary cost fetch and client initialization propagate
/// them as fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("access denied: {context}")]
    AccessDenied { context: String },

    #[error("no data available: {context}")]
    DataUnavailable { context: String },

    #[error("invalid parameter: {context}")]
    InvalidParameter { context: String },

    #[error("AWS credentials not found or invalid: {message}")]
    Credentials { message: String },

    #[error("AWS API error ({code}): {message}")]
    Api { code: String, message: String },
}

impl SourceError {
    pub fn access_denied(context: impl Into<String>) -> Self {
        Self::AccessDenied {
            context: context.into(),
        }
    }

    pub fn data_unavailable(context: impl Into<String>) -> Self {
        Self::DataUnavailable {
            context: context.into(),
        }
    }

    pub fn invalid_parameter(context: impl Into<String>) -> Self {
        Self::InvalidParameter {
            context: context.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Fatal error for a report run.
///
/// Trailing-month and per-category failures never surface here; they are
/// recorded as scoped warnings on the affected aggregate instead.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to fetch cost data for the selected month: {0}")]
    Source(#[from] SourceError),

    #[error("invalid month '{input}': {reason}")]
    InvalidMonth { input: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display_includes_context() {
        let err = SourceError::access_denied("savings plan coverage");
        assert_eq!(err.to_string(), "access denied: savings plan coverage");

        let err = SourceError::api("ThrottlingException", "rate exceeded");
        assert_eq!(
            err.to_string(),
            "AWS API error (ThrottlingException): rate exceeded"
        );
    }

    #[test]
    fn test_report_error_wraps_source_error() {
        let err: ReportError = SourceError::data_unavailable("cost and usage").into();
        assert!(err.to_string().contains("selected month"));
        assert!(err.to_string().contains("cost and usage"));
    }
}
