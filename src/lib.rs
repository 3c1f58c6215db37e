//! Instrumented DynamoDB control-plane client.
//!
//! Wraps the table administration calls of `aws-sdk-dynamodb`
//! (`ListTables`, `DescribeTable`, `UpdateTable`) so that every call is timed
//! and every failure is logged with context, without changing what the SDK
//! returns.
//!
//! - [`DynamoDb`] - the instrumented client
//! - [`TableControlPlane`] - the seam to the underlying SDK client
//! - [`DiagnosticsSink`] - where timings and failure records go
//! - [`DynamoOptions`] - region, credentials, endpoint, timeouts and retries

pub mod client;
pub mod config;
pub mod control_plane;
pub mod diagnostics;
pub mod errors;
pub mod logging;

pub use client::{COMPONENT, DynamoDb};
pub use config::{DynamoOptions, build_client};
pub use control_plane::{
    DescribeTableRequest, ListTablesRequest, TableControlPlane, UpdateTableRequest,
};
pub use diagnostics::{DiagnosticRecord, DiagnosticsSink, Stopwatch, TracingSink};
pub use errors::{ConfigError, DynamoError, ErrorKind, classify, ensure_present};
pub use logging::init_logging;
