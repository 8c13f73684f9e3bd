//! Per-run state shared with command handlers

use std::path::PathBuf;

use serde::Serialize;

use lv_core::{CloudContext, Result, RunConfig};
use lv_s3::{AwsProvider, AwsSession, S3Client};

use crate::commands::Cli;
use crate::output::{OutputContext, RenderOptions, Renderer};

/// Everything a command handler can reach during a run
#[derive(Debug)]
pub struct RunContext {
    /// Parsed command line
    pub args: Cli,
    /// Settings derived from the command line and project file
    pub config: RunConfig,
    /// Standard output and standard error for this run
    pub streams: OutputContext,
    /// Renders values to the configured destination
    pub renderer: Renderer,
    /// Lazily opened AWS session and S3 client
    pub cloud: CloudContext<AwsProvider>,
}

impl RunContext {
    pub fn new(args: Cli, config: RunConfig, streams: OutputContext) -> Self {
        let renderer = Renderer::new(&config);
        let cloud = CloudContext::new(AwsProvider, config.cloud.clone());
        Self {
            args,
            config,
            streams,
            renderer,
            cloud,
        }
    }

    /// Render a value with the run's default options
    pub fn render<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.render_with(value, RenderOptions::default())
    }

    /// Render a value with per-call overrides
    pub fn render_with<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        options: RenderOptions,
    ) -> Result<()> {
        self.renderer.render(&mut self.streams, value, options)
    }

    /// The AWS session, opened on first use
    pub async fn aws_session(&self) -> Result<&AwsSession> {
        self.cloud.session().await
    }

    /// The S3 client, created on first use
    pub async fn s3(&self) -> Result<&S3Client> {
        self.cloud.client().await
    }

    /// Resolve a user-supplied path against the run's working directory
    pub fn abspath(&self, path: &str) -> Result<PathBuf> {
        self.config.abspath(path)
    }
}
