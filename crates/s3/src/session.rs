//! AWS session and provider
//!
//! A session is a loaded `SdkConfig` whose credentials have been resolved at
//! least once, so that missing or broken credentials surface when the session
//! is opened rather than on the first request.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials as _;

use lv_core::{CloudProvider, CloudSelector, Error, Result};

use crate::client::S3Client;

/// An authenticated AWS session
#[derive(Debug, Clone)]
pub struct AwsSession {
    config: SdkConfig,
}

impl AwsSession {
    /// Load a session from the ambient AWS configuration
    ///
    /// The profile and region override the environment defaults when given.
    pub async fn load(selector: &CloudSelector) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &selector.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &selector.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let config = loader.load().await;
        Self::verify(config).await
    }

    /// Wrap an existing SDK configuration after resolving its credentials
    pub async fn verify(config: SdkConfig) -> Result<Self> {
        let provider = config
            .credentials_provider()
            .ok_or_else(|| Error::Auth("No credentials provider configured".into()))?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        if config.region().is_none() {
            tracing::warn!("No AWS region configured; requests may fail");
        }

        Ok(Self { config })
    }

    /// The underlying SDK configuration
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// The region this session targets, if any
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }
}

/// `CloudProvider` backed by the AWS SDK
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsProvider;

#[async_trait]
impl CloudProvider for AwsProvider {
    type Session = AwsSession;
    type Client = S3Client;

    async fn open_session(&self, selector: &CloudSelector) -> Result<AwsSession> {
        AwsSession::load(selector).await
    }

    fn open_client(&self, session: &AwsSession) -> Result<S3Client> {
        Ok(S3Client::new(session))
    }
}
