//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use salgspuls_domain::SalgspulsError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SalgspulsError);

impl From<InfraError> for SalgspulsError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SalgspulsError> for InfraError {
    fn from(value: SalgspulsError) -> Self {
        Self(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let description = value.to_string();
        let mapped = if value.is_timeout() {
            SalgspulsError::Network(format!("http request timed out: {description}"))
        } else if value.is_connect() {
            SalgspulsError::Network(format!("http connection failed: {description}"))
        } else if value.is_decode() {
            SalgspulsError::Store(format!("malformed http response body: {description}"))
        } else {
            SalgspulsError::Network(format!("http error: {description}"))
        };
        Self(mapped)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(SalgspulsError::Store(format!("invalid json payload: {value}")))
    }
}
