//! Instrumented DynamoDB control-plane client.
//!
//! Every operation follows the same template:
//! 1. start a [`Stopwatch`] labelled `DynamoDB.<operation>`
//! 2. check required inputs
//! 3. await the underlying client
//! 4. on failure, emit one [`DiagnosticRecord`] and return the error unchanged
//!
//! The stopwatch is a drop guard, so the timer is finalized on every path.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::ProvideErrorMetadata;
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
use aws_sdk_dynamodb::operation::list_tables::{ListTablesError, ListTablesInput, ListTablesOutput};
use aws_sdk_dynamodb::operation::update_table::{UpdateTableError, UpdateTableOutput};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::config::{DynamoOptions, build_client};
use crate::control_plane::{
    DescribeTableRequest, ListTablesRequest, TableControlPlane, UpdateTableRequest,
};
use crate::diagnostics::{DiagnosticRecord, DiagnosticsSink, Stopwatch};
use crate::errors::{ConfigError, DynamoError, ensure_present};

/// Component name used in timer labels and diagnostic records.
pub const COMPONENT: &str = "DynamoDB";

const LIST_TABLES: &str = "list_tables";
const DESCRIBE_TABLE: &str = "describe_table";
const UPDATE_TABLE: &str = "update_table";

/// DynamoDB client that times every call and logs every failure.
///
/// Holds one underlying client for its whole lifetime and no other mutable
/// state, so a single instance can serve concurrent calls through `&self`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dynamo_control::{DynamoDb, DynamoOptions, TracingSink};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let db = DynamoDb::connect(Some(DynamoOptions::from_env()), Arc::new(TracingSink)).await?;
/// let tables = db.list_tables(None).await?;
/// for name in tables.table_names() {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct DynamoDb<C = Client> {
    client: C,
    sink: Arc<dyn DiagnosticsSink>,
    region: Option<String>,
}

impl DynamoDb<Client> {
    /// Build the SDK client from `options` and wrap it.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidArgument("dynamo_options")` if `options` is `None`,
    /// or any validation error from the options themselves.
    pub async fn connect(
        options: Option<DynamoOptions>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, ConfigError> {
        let options = options.ok_or(ConfigError::InvalidArgument("dynamo_options"))?;
        let client = build_client(&options).await?;
        let region = client.config().region().map(|r| r.to_string());

        info!(region = ?region, endpoint_url = ?options.endpoint_url, "Connected to DynamoDB");

        Ok(Self {
            client,
            sink,
            region,
        })
    }
}

impl<C: TableControlPlane> DynamoDb<C> {
    /// Wrap an existing control-plane client.
    pub fn with_client(client: C, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            client,
            sink,
            region: None,
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Region the SDK client resolved, when built from options.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// List table names. `None` lists from the start with the service default page size.
    pub async fn list_tables(
        &self,
        params: Option<ListTablesRequest>,
    ) -> Result<ListTablesOutput, DynamoError<ListTablesError>> {
        let _sw = Stopwatch::start(self.sink.as_ref(), "DynamoDB.list_tables");

        let result = self
            .client
            .list_tables(params.unwrap_or_default())
            .await
            .map_err(DynamoError::Delegate);

        result.inspect_err(|err| self.report(LIST_TABLES, None, err))
    }

    /// Describe one table.
    ///
    /// # Errors
    ///
    /// `DynamoError::InvalidArgument("params")` if `params` is `None`; the
    /// underlying client is not called in that case.
    pub async fn describe_table(
        &self,
        params: Option<DescribeTableRequest>,
    ) -> Result<DescribeTableOutput, DynamoError<DescribeTableError>> {
        let _sw = Stopwatch::start(self.sink.as_ref(), "DynamoDB.describe_table");
        let rendered = render(&params);

        let result = match ensure_present(params, "params") {
            Ok(input) => self
                .client
                .describe_table(input)
                .await
                .map_err(DynamoError::Delegate),
            Err(err) => Err(err),
        };

        result.inspect_err(|err| self.report(DESCRIBE_TABLE, rendered, err))
    }

    /// Change a table's throughput, indexes, streams or other settings.
    ///
    /// # Errors
    ///
    /// `DynamoError::InvalidArgument("params")` if `params` is `None`; the
    /// underlying client is not called in that case.
    pub async fn update_table(
        &self,
        params: Option<UpdateTableRequest>,
    ) -> Result<UpdateTableOutput, DynamoError<UpdateTableError>> {
        let _sw = Stopwatch::start(self.sink.as_ref(), "DynamoDB.update_table");
        let rendered = render(&params);

        let result = match ensure_present(params, "params") {
            Ok(input) => self
                .client
                .update_table(input)
                .await
                .map_err(DynamoError::Delegate),
            Err(err) => Err(err),
        };

        result.inspect_err(|err| self.report(UPDATE_TABLE, rendered, err))
    }

    /// Check connectivity with a one-item `ListTables` call.
    pub async fn ping(&self) -> Result<bool, DynamoError<ListTablesError>> {
        self.list_tables(Some(ListTablesInput::builder().limit(1)))
            .await
            .map(|_| true)
    }

    fn report<E>(&self, function: &'static str, params: Option<String>, err: &DynamoError<E>)
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let kind = err.kind();
        self.sink.warning(&DiagnosticRecord {
            class: COMPONENT,
            function,
            params,
            error_kind: kind,
            transient: kind.is_transient(),
            error: err.describe(),
        });
    }
}

/// Request snapshot for the failure record, taken before the request is moved.
fn render<T: fmt::Debug>(params: &Option<T>) -> Option<String> {
    params.as_ref().map(|p| format!("{:?}", p))
}

impl<C> fmt::Debug for DynamoDb<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDb")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
