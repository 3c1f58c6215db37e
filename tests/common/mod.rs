//! Shared test doubles: a counting control-plane client and a recording sink.

#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{ErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
use aws_sdk_dynamodb::operation::list_tables::{ListTablesError, ListTablesOutput};
use aws_sdk_dynamodb::operation::update_table::{UpdateTableError, UpdateTableOutput};
use aws_smithy_runtime_api::http::{Response, StatusCode};
use aws_smithy_types::body::SdkBody;
use dynamo_control::control_plane::{DescribeTableRequest, ListTablesRequest, UpdateTableRequest};
use dynamo_control::{DiagnosticRecord, DiagnosticsSink, TableControlPlane};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Reply<O, E> = Box<dyn Fn() -> Result<O, SdkError<E>> + Send + Sync>;

/// Control-plane double with one canned reply per operation.
pub struct FakeControlPlane {
    list_reply: Reply<ListTablesOutput, ListTablesError>,
    describe_reply: Reply<DescribeTableOutput, DescribeTableError>,
    update_reply: Reply<UpdateTableOutput, UpdateTableError>,
    delay: Option<Duration>,
    pub list_calls: AtomicUsize,
    pub describe_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub last_list: Mutex<Option<ListTablesRequest>>,
    pub last_describe: Mutex<Option<DescribeTableRequest>>,
    pub last_update: Mutex<Option<UpdateTableRequest>>,
}

impl Default for FakeControlPlane {
    fn default() -> Self {
        Self {
            list_reply: Box::new(|| Err(SdkError::construction_failure("no list_tables reply"))),
            describe_reply: Box::new(|| {
                Err(SdkError::construction_failure("no describe_table reply"))
            }),
            update_reply: Box::new(|| Err(SdkError::construction_failure("no update_table reply"))),
            delay: None,
            list_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            last_list: Mutex::new(None),
            last_describe: Mutex::new(None),
            last_update: Mutex::new(None),
        }
    }
}

impl FakeControlPlane {
    pub fn on_list_tables(
        mut self,
        reply: impl Fn() -> Result<ListTablesOutput, SdkError<ListTablesError>> + Send + Sync + 'static,
    ) -> Self {
        self.list_reply = Box::new(reply);
        self
    }

    pub fn on_describe_table(
        mut self,
        reply: impl Fn() -> Result<DescribeTableOutput, SdkError<DescribeTableError>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.describe_reply = Box::new(reply);
        self
    }

    pub fn on_update_table(
        mut self,
        reply: impl Fn() -> Result<UpdateTableOutput, SdkError<UpdateTableError>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.update_reply = Box::new(reply);
        self
    }

    /// Sleep before answering, to keep calls in flight together.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.describe_calls.load(Ordering::SeqCst)
            + self.update_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TableControlPlane for FakeControlPlane {
    async fn list_tables(
        &self,
        input: ListTablesRequest,
    ) -> Result<ListTablesOutput, SdkError<ListTablesError>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_list.lock().unwrap() = Some(input);
        self.pause().await;
        (self.list_reply)()
    }

    async fn describe_table(
        &self,
        input: DescribeTableRequest,
    ) -> Result<DescribeTableOutput, SdkError<DescribeTableError>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_describe.lock().unwrap() = Some(input);
        self.pause().await;
        (self.describe_reply)()
    }

    async fn update_table(
        &self,
        input: UpdateTableRequest,
    ) -> Result<UpdateTableOutput, SdkError<UpdateTableError>> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().unwrap() = Some(input);
        self.pause().await;
        (self.update_reply)()
    }
}

/// Sink that counts timers and keeps every failure record.
#[derive(Default)]
pub struct RecordingSink {
    pub started: Mutex<Vec<&'static str>>,
    pub ended: Mutex<Vec<&'static str>>,
    pub records: Mutex<Vec<DiagnosticRecord>>,
}

impl RecordingSink {
    pub fn started(&self) -> Vec<&'static str> {
        self.started.lock().unwrap().clone()
    }

    pub fn ended(&self) -> Vec<&'static str> {
        self.ended.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn timer_started(&self, label: &'static str) {
        self.started.lock().unwrap().push(label);
    }

    fn timer_ended(&self, label: &'static str, _elapsed: Duration) {
        self.ended.lock().unwrap().push(label);
    }

    fn warning(&self, record: &DiagnosticRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// A modeled service error as the SDK would surface it.
pub fn service_error<E>(err: E) -> SdkError<E> {
    SdkError::service_error(
        err,
        Response::new(StatusCode::try_from(400).unwrap(), SdkBody::empty()),
    )
}

pub fn meta(code: &str, message: &str) -> ErrorMetadata {
    ErrorMetadata::builder().code(code).message(message).build()
}
