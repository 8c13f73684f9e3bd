//! lv-s3: AWS adapter for lambda-venv
//!
//! Provides the `CloudProvider` implementation that opens AWS sessions and
//! the S3 clients derived from them. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
pub mod session;

pub use client::S3Client;
pub use session::{AwsProvider, AwsSession};
