use crate::application::services::remote_client::{RemoteClient, VkRemoteClient};
use crate::config::RestApiConfig;
use crate::error::AppError;
use crate::session::interface::VkSession;
use crate::transport::http_client::VkHttpClientImpl;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Produces an authenticated [`RemoteClient`] from an access token.
#[async_trait]
pub trait VkAuthenticator: Send + Sync {
    type Client: RemoteClient;

    async fn login(&self, access_token: &str) -> Result<Self::Client, AppError>;
}

/// Token-based authenticator for the VK HTTP API.
#[derive(Debug, Clone)]
pub struct VkAuth {
    config: RestApiConfig,
}

impl VkAuth {
    pub fn new(config: &RestApiConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Builds the session credentials; a blank token is rejected without any request.
    pub fn authenticate(&self, access_token: &str) -> Result<VkSession, AppError> {
        if access_token.trim().is_empty() {
            return Err(AppError::BlankToken);
        }
        Ok(VkSession::new(access_token, &self.config.api_version))
    }
}

#[async_trait]
impl VkAuthenticator for VkAuth {
    type Client = VkRemoteClient<VkHttpClientImpl>;

    #[instrument(skip(self, access_token))]
    async fn login(&self, access_token: &str) -> Result<Self::Client, AppError> {
        let session = self.authenticate(access_token)?;
        let http = VkHttpClientImpl::new(&self.config)?;

        debug!("Authenticated against {} (v{})", self.config.base_url, session.api_version);
        Ok(VkRemoteClient::new(Arc::new(http), session))
    }
}
