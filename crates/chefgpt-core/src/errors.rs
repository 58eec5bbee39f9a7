// ABOUTME: Unified error type and error codes for the recipe server
// ABOUTME: Maps generation, validation, provider, and storage failures to HTTP statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Unified Error Handling
//!
//! Every failure in the request path (bad input, unparseable provider output,
//! missing recipe fields, provider outages, storage errors) is an [`AppError`]
//! carrying an [`ErrorCode`]. Handlers return `Result<_, AppError>` and the
//! code alone decides the HTTP status, so failures bubble up unmodified.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller input (400)
    /// The request itself is unusable (e.g. empty ingredient list)
    InvalidInput,
    /// A parsed recipe lacks a required field
    MissingRequiredField,
    /// A value is outside its accepted range (e.g. rating above 5)
    ValueOutOfRange,

    // Resources (404)
    /// The requested record does not exist
    ResourceNotFound,

    // Provider output (500)
    /// Provider output could not be parsed into any supported recipe shape
    MalformedResponse,

    // External services (500)
    /// Provider answered with an unexpected error
    ExternalServiceError,
    /// Provider could not be reached or timed out
    ExternalServiceUnavailable,
    /// Provider rejected our credentials
    ExternalAuthFailed,
    /// Provider throttled the request
    ExternalRateLimited,

    // Internal (500)
    /// Configuration is missing or invalid
    ConfigError,
    /// The recipe store failed
    DatabaseError,
    /// JSON (de)serialization failed
    SerializationError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::ResourceNotFound => 404,
            Self::MalformedResponse
            | Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited
            | Self::ConfigError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "The generated recipe is missing a required field",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::MalformedResponse => "The AI provider returned a response that could not be parsed",
            Self::ExternalServiceError => "The AI provider encountered an error",
            Self::ExternalServiceUnavailable => "The AI provider is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the AI provider failed",
            Self::ExternalRateLimited => "The AI provider rate limit was exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether this code represents an unavailable or failing completion provider
    #[must_use]
    pub const fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError
                | Self::ExternalServiceUnavailable
                | Self::ExternalAuthFailed
                | Self::ExternalRateLimited
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Identifier of the record the error concerns
    pub resource_id: Option<String>,
    /// Name of the missing or invalid recipe field
    pub field: Option<String>,
    /// Raw provider output kept for diagnostics; never sent to clients
    pub raw_response: Option<String>,
    /// Additional key-value context
    pub details: Option<serde_json::Value>,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Name of the recipe field a validation error refers to
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.context.field.as_deref()
    }

    /// Raw provider output attached to a malformed-response error
    #[must_use]
    pub fn raw_response(&self) -> Option<&str> {
        self.context.raw_response.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
///
/// `detail` matches the field name the web client reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Name of the offending field for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Extra structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            detail: error.message,
            code: error.code,
            field: error.context.field,
            details: error.context.details,
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Caller supplied insufficient input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A parsed recipe is missing a required field
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let mut error = Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        );
        error.context.field = Some(field);
        error
    }

    /// A parsed recipe field has a value of the wrong type
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        let mut error = Self::new(
            ErrorCode::MissingRequiredField,
            format!("Invalid value for field {field}: {}", reason.into()),
        );
        error.context.field = Some(field);
        error
    }

    /// A value is outside the accepted range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Provider output could not be parsed; keeps the raw text for diagnostics
    #[must_use]
    pub fn malformed_response(message: impl Into<String>, raw: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::MalformedResponse, message);
        error.context.raw_response = Some(raw.into());
        error
    }

    /// Provider could not be reached or did not answer in time
    #[must_use]
    pub fn provider_unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", provider.into(), message.into()),
        )
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON processing failed: {error}"),
        )
        .with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(format!("Database query failed: {error}")).with_source(error)
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;
    use tracing::{error, warn};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if status.is_server_error() {
                error!(
                    error.code = ?self.code,
                    error.message = %self.message,
                    raw_response = self.raw_response().unwrap_or(""),
                    "Request failed"
                );
            } else {
                warn!(
                    error.code = ?self.code,
                    error.message = %self.message,
                    "Request rejected"
                );
            }

            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::ValueOutOfRange.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::MalformedResponse.http_status(), 500);
        assert_eq!(ErrorCode::ExternalServiceUnavailable.http_status(), 500);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_missing_field_names_field() {
        let error = AppError::missing_field("servings");
        assert_eq!(error.code, ErrorCode::MissingRequiredField);
        assert_eq!(error.field(), Some("servings"));
        assert_eq!(error.message, "Missing required field: servings");
    }

    #[test]
    fn test_malformed_response_keeps_raw_text_out_of_body() {
        let error = AppError::malformed_response("bad json", "{ not json");
        assert_eq!(error.raw_response(), Some("{ not json"));

        let json = serde_json::to_string(&ErrorResponse::from(error)).unwrap();
        assert!(json.contains("MALFORMED_RESPONSE"));
        assert!(!json.contains("not json"));
    }

    #[test]
    fn test_provider_failure_classification() {
        assert!(ErrorCode::ExternalRateLimited.is_provider_failure());
        assert!(ErrorCode::ExternalAuthFailed.is_provider_failure());
        assert!(!ErrorCode::MalformedResponse.is_provider_failure());
    }
}
