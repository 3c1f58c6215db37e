//! Client configuration.
//!
//! [`DynamoOptions`] describes how to reach DynamoDB. Credentials are picked
//! in this order:
//! 1. Hardcoded credentials (access_key, secret_key, session_token)
//! 2. AWS profile from ~/.aws/credentials
//! 3. Default credential chain (environment variables, instance profile, etc.)

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::ConfigError;

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Provider name attached to hardcoded credentials.
const STATIC_CREDENTIALS_PROVIDER: &str = "dynamo-control-static";

/// Options for building the underlying DynamoDB client.
///
/// Every field is optional; an empty value falls back to the SDK's default
/// provider chains.
///
/// # Examples
///
/// ```
/// use dynamo_control::DynamoOptions;
///
/// // Local endpoint (DynamoDB Local, localstack)
/// let options = DynamoOptions {
///     endpoint_url: Some("http://localhost:8000".to_string()),
///     region: Some("us-west-2".to_string()),
///     ..Default::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DynamoOptions {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    /// Connect timeout in seconds.
    pub connect_timeout: Option<f64>,
    /// Read timeout in seconds.
    pub read_timeout: Option<f64>,
    /// Retries after the first attempt.
    pub max_retries: Option<u32>,
}

impl DynamoOptions {
    /// Options taken from the standard AWS environment variables.
    ///
    /// Credentials are left to the default chain, which reads
    /// `AWS_ACCESS_KEY_ID` and friends itself.
    pub fn from_env() -> Self {
        Self {
            region: env_var("AWS_REGION").or_else(|| env_var("AWS_DEFAULT_REGION")),
            profile: env_var("AWS_PROFILE"),
            endpoint_url: env_var("AWS_ENDPOINT_URL_DYNAMODB")
                .or_else(|| env_var("AWS_ENDPOINT_URL")),
            ..Default::default()
        }
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the options for combinations the SDK would reject or panic on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.access_key, &self.secret_key) {
            (Some(_), None) => return Err(ConfigError::InvalidArgument("secret_key")),
            (None, Some(_)) => return Err(ConfigError::InvalidArgument("access_key")),
            _ => {}
        }
        if self.session_token.is_some() && self.access_key.is_none() {
            return Err(ConfigError::InvalidArgument("access_key"));
        }

        check_timeout("connect_timeout", self.connect_timeout)?;
        check_timeout("read_timeout", self.read_timeout)?;

        if let Some(url) = &self.endpoint_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "endpoint_url",
                reason: format!("'{}' is not an http(s) URL", url),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn check_timeout(field: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(secs) if !secs.is_finite() || secs <= 0.0 => Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive number of seconds, got {}", secs),
        }),
        _ => Ok(()),
    }
}

/// Build the AWS SDK DynamoDB client from options.
pub async fn build_client(options: &DynamoOptions) -> Result<Client, ConfigError> {
    options.validate()?;

    // Region priority: param > SDK default chain (env, profile) > default
    let region_provider = RegionProviderChain::first_try(options.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    // Credentials priority: hardcoded > profile > env/default chain
    if let (Some(ak), Some(sk)) = (&options.access_key, &options.secret_key) {
        let creds = Credentials::new(
            ak,
            sk,
            options.session_token.clone(),
            None,
            STATIC_CREDENTIALS_PROVIDER,
        );
        config_loader = config_loader.credentials_provider(creds);
    } else if let Some(profile_name) = &options.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }

    if options.connect_timeout.is_some() || options.read_timeout.is_some() {
        let mut timeouts = TimeoutConfig::builder();
        if let Some(secs) = options.connect_timeout {
            timeouts = timeouts.connect_timeout(Duration::from_secs_f64(secs));
        }
        if let Some(secs) = options.read_timeout {
            timeouts = timeouts.read_timeout(Duration::from_secs_f64(secs));
        }
        config_loader = config_loader.timeout_config(timeouts.build());
    }

    if let Some(retries) = options.max_retries {
        config_loader = config_loader
            .retry_config(RetryConfig::standard().with_max_attempts(retries.saturating_add(1)));
    }

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &options.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    debug!(
        region = ?sdk_config.region(),
        endpoint_url = ?options.endpoint_url,
        "Built DynamoDB client"
    );

    Ok(Client::from_conf(dynamo_config.build()))
}
