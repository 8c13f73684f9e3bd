//! S3 client
//!
//! Thin wrapper over aws-sdk-s3 built from an open session.

use crate::session::AwsSession;

/// S3 client wrapper
#[derive(Debug, Clone)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create an S3 client that shares the session's configuration
    pub fn new(session: &AwsSession) -> Self {
        Self {
            inner: aws_sdk_s3::Client::new(session.sdk_config()),
        }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// The region requests are sent to, if any
    pub fn region(&self) -> Option<&str> {
        self.inner.config().region().map(|r| r.as_ref())
    }
}
