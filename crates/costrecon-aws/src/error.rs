//! SDK error mapping
//!
//! Collapses the per-operation SDK error types into the core's categorized
//! `SourceError` so the aggregation layer never sees raw transport errors.

use aws_sdk_costexplorer::error::ProvideErrorMetadata;
use costrecon_core::SourceError;

/// Map any SDK error (service or transport) to a `SourceError` category.
pub(crate) fn map_api_error<E: ProvideErrorMetadata>(err: &E, context: &str) -> SourceError {
    let code = err.code().unwrap_or("Unknown");
    let message = err.message().unwrap_or("request failed").to_string();

    if code.starts_with("AccessDenied") || code == "UnauthorizedOperation" {
        SourceError::access_denied(format!("{}: {}", context, message))
    } else if code == "DataUnavailableException" {
        SourceError::data_unavailable(context.to_string())
    } else if code == "InvalidParameterValueException" || code == "InvalidParameterException" {
        SourceError::invalid_parameter(format!("{}: {}", context, message))
    } else {
        SourceError::api(code, format!("{}: {}", context, message))
    }
}
