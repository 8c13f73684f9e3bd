//! Lazily constructed cloud resources
//!
//! Commands share one cloud session and one storage client per run. Neither
//! is built until a command asks for it, and each is built at most once. A
//! failed construction is not remembered, so the next request tries again.
//!
//! The provider trait keeps this crate independent of any cloud SDK.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::CloudSelector;
use crate::error::Result;

/// Builds sessions and the storage clients derived from them
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Authenticated session handle
    type Session: Send + Sync;

    /// Storage service client derived from a session
    type Client: Send + Sync;

    /// Open a session for the given profile and region
    async fn open_session(&self, selector: &CloudSelector) -> Result<Self::Session>;

    /// Create a storage client from an open session
    fn open_client(&self, session: &Self::Session) -> Result<Self::Client>;
}

/// Per-run holder of the memoized session and client
pub struct CloudContext<P: CloudProvider> {
    provider: P,
    selector: CloudSelector,
    session: OnceCell<P::Session>,
    client: OnceCell<P::Client>,
}

impl<P: CloudProvider> CloudContext<P> {
    /// Create an empty context; nothing is constructed yet
    pub fn new(provider: P, selector: CloudSelector) -> Self {
        Self {
            provider,
            selector,
            session: OnceCell::new(),
            client: OnceCell::new(),
        }
    }

    /// The profile and region sessions are opened with
    pub fn selector(&self) -> &CloudSelector {
        &self.selector
    }

    /// Get the session, opening it on first use
    pub async fn session(&self) -> Result<&P::Session> {
        self.session
            .get_or_try_init(|| async {
                tracing::debug!(
                    profile = self.selector.profile.as_deref().unwrap_or("<default>"),
                    region = self.selector.region.as_deref().unwrap_or("<default>"),
                    "Opening cloud session"
                );
                self.provider.open_session(&self.selector).await
            })
            .await
    }

    /// Get the storage client, creating it (and the session) on first use
    pub async fn client(&self) -> Result<&P::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let session = self.session().await?;
        self.client
            .get_or_try_init(|| async {
                tracing::debug!("Creating storage client");
                self.provider.open_client(session)
            })
            .await
    }

    /// Whether the session has been opened
    pub fn has_session(&self) -> bool {
        self.session.initialized()
    }

    /// Whether the storage client has been created
    pub fn has_client(&self) -> bool {
        self.client.initialized()
    }
}

impl<P: CloudProvider> std::fmt::Debug for CloudContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudContext")
            .field("selector", &self.selector)
            .field("session", &self.has_session())
            .field("client", &self.has_client())
            .finish()
    }
}
