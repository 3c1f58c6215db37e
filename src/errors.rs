//! Error types for dynamo-control.
//!
//! Operations fail in exactly two ways: a required argument was missing, or
//! the SDK call itself failed. SDK failures are carried unchanged so callers
//! see the same `SdkError` they would get from `aws_sdk_dynamodb::Client`.
//!
//! [`ErrorKind`] classifies an `SdkError` for diagnostics using typed
//! `SdkError` variant matching and `ProvideErrorMetadata`, no string parsing
//! of service responses.

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error returned by every instrumented DynamoDB operation.
///
/// `E` is the operation's modeled error (e.g. `DescribeTableError`).
#[derive(Debug, Error)]
pub enum DynamoError<E> {
    /// A required input was not supplied. Holds the parameter name.
    #[error("Parameter '{0}' is not set")]
    InvalidArgument(&'static str),

    /// The underlying SDK call failed. The error is exactly what the SDK returned.
    #[error(transparent)]
    Delegate(SdkError<E>),
}

impl<E> DynamoError<E> {
    /// True when a required input was missing and the SDK was never called.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DynamoError::InvalidArgument(_))
    }

    /// Borrow the SDK error, if this is a delegate failure.
    pub fn as_delegate(&self) -> Option<&SdkError<E>> {
        match self {
            DynamoError::Delegate(err) => Some(err),
            DynamoError::InvalidArgument(_) => None,
        }
    }

    /// Take back the original SDK error.
    ///
    /// Returns `Err(self)` for argument errors so nothing is lost.
    pub fn into_delegate(self) -> Result<SdkError<E>, Self> {
        match self {
            DynamoError::Delegate(err) => Ok(err),
            other => Err(other),
        }
    }
}

impl<E> DynamoError<E>
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    /// Classify this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DynamoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DynamoError::Delegate(err) => classify(err),
        }
    }

    /// Full error chain, suitable for a log line.
    pub(crate) fn describe(&self) -> String {
        match self {
            DynamoError::InvalidArgument(_) => self.to_string(),
            DynamoError::Delegate(err) => DisplayErrorContext(err).to_string(),
        }
    }
}

/// Invariant check for required inputs.
///
/// Returns the value or `DynamoError::InvalidArgument(name)`.
pub fn ensure_present<T, E>(value: Option<T>, name: &'static str) -> Result<T, DynamoError<E>> {
    value.ok_or(DynamoError::InvalidArgument(name))
}

/// Errors raised while turning [`DynamoOptions`](crate::DynamoOptions) into a client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter '{0}' is not set")]
    InvalidArgument(&'static str),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Invalid options document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Coarse failure category, recorded with every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    Connection,
    Timeout,
    Credentials,
    AccessDenied,
    Throttled,
    ResourceNotFound,
    ResourceInUse,
    Validation,
    Construction,
    Response,
    Service,
    Unknown,
}

impl ErrorKind {
    /// Stable snake_case name, as used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Credentials => "credentials",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::Throttled => "throttled",
            ErrorKind::ResourceNotFound => "resource_not_found",
            ErrorKind::ResourceInUse => "resource_in_use",
            ErrorKind::Validation => "validation",
            ErrorKind::Construction => "construction",
            ErrorKind::Response => "response",
            ErrorKind::Service => "service",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Whether retrying the same request later could succeed.
    ///
    /// # Returns
    ///
    /// `true` for connection, timeout and throttling failures.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Timeout | ErrorKind::Throttled
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========== TYPED ERROR CLASSIFICATION ==========

/// Classify an SDK error without consuming or altering it.
///
/// # Arguments
///
/// * `err` - Any DynamoDB operation's `SdkError`
///
/// # Returns
///
/// The failure category. Service errors are matched on their error code.
pub fn classify<E, R>(err: &SdkError<E, R>) -> ErrorKind
where
    E: ProvideErrorMetadata,
    R: fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            if dispatch.is_timeout() {
                ErrorKind::Timeout
            } else {
                ErrorKind::Connection
            }
        }
        SdkError::TimeoutError(_) => ErrorKind::Timeout,
        SdkError::ConstructionFailure(failure) => {
            let msg = format!("{:?}", failure);
            if msg.contains("credentials")
                || msg.contains("Credentials")
                || msg.contains("NoCredentialsError")
            {
                ErrorKind::Credentials
            } else {
                ErrorKind::Construction
            }
        }
        SdkError::ResponseError(_) => ErrorKind::Response,
        SdkError::ServiceError(service_err) => classify_code(service_err.err().code()),
        _ => ErrorKind::Unknown,
    }
}

/// Map a DynamoDB service error code to its category.
fn classify_code(code: Option<&str>) -> ErrorKind {
    let Some(code) = code else {
        return ErrorKind::Service;
    };

    match code {
        "UnrecognizedClientException"
        | "InvalidSignatureException"
        | "ExpiredTokenException"
        | "MissingAuthenticationTokenException" => ErrorKind::Credentials,
        "AccessDeniedException" => ErrorKind::AccessDenied,
        "ProvisionedThroughputExceededException"
        | "LimitExceededException"
        | "RequestLimitExceeded"
        | "ThrottlingException" => ErrorKind::Throttled,
        "ResourceNotFoundException" | "TableNotFoundException" => ErrorKind::ResourceNotFound,
        "ResourceInUseException" => ErrorKind::ResourceInUse,
        "ValidationException" => ErrorKind::Validation,
        _ => ErrorKind::Service,
    }
}
