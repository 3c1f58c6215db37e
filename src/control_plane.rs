//! The remote-service seam.
//!
//! [`TableControlPlane`] is the set of DynamoDB control-plane calls the
//! instrumented client forwards to. Requests travel as the SDK's input
//! builders, and `aws_sdk_dynamodb::Client` sends them with `send_with`, so
//! every field the caller set reaches the wire as-is. Tests swap in their own
//! implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::describe_table::builders::DescribeTableInputBuilder;
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
use aws_sdk_dynamodb::operation::list_tables::builders::ListTablesInputBuilder;
use aws_sdk_dynamodb::operation::list_tables::{ListTablesError, ListTablesOutput};
use aws_sdk_dynamodb::operation::update_table::builders::UpdateTableInputBuilder;
use aws_sdk_dynamodb::operation::update_table::{UpdateTableError, UpdateTableOutput};

/// `ListTables` request, e.g. `ListTablesInput::builder().limit(10)`.
pub type ListTablesRequest = ListTablesInputBuilder;

/// `DescribeTable` request, e.g. `DescribeTableInput::builder().table_name("users")`.
pub type DescribeTableRequest = DescribeTableInputBuilder;

/// `UpdateTable` request, e.g. `UpdateTableInput::builder().table_name("users")`.
pub type UpdateTableRequest = UpdateTableInputBuilder;

/// DynamoDB table administration calls.
#[async_trait]
pub trait TableControlPlane: Send + Sync {
    async fn list_tables(
        &self,
        request: ListTablesRequest,
    ) -> Result<ListTablesOutput, SdkError<ListTablesError>>;

    async fn describe_table(
        &self,
        request: DescribeTableRequest,
    ) -> Result<DescribeTableOutput, SdkError<DescribeTableError>>;

    async fn update_table(
        &self,
        request: UpdateTableRequest,
    ) -> Result<UpdateTableOutput, SdkError<UpdateTableError>>;
}

#[async_trait]
impl TableControlPlane for Client {
    async fn list_tables(
        &self,
        request: ListTablesRequest,
    ) -> Result<ListTablesOutput, SdkError<ListTablesError>> {
        request.send_with(self).await
    }

    async fn describe_table(
        &self,
        request: DescribeTableRequest,
    ) -> Result<DescribeTableOutput, SdkError<DescribeTableError>> {
        request.send_with(self).await
    }

    async fn update_table(
        &self,
        request: UpdateTableRequest,
    ) -> Result<UpdateTableOutput, SdkError<UpdateTableError>> {
        request.send_with(self).await
    }
}
