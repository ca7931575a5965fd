use crate::config::RestApiConfig;
use crate::constants::{ACCESS_TOKEN_PARAM, USER_AGENT, VERSION_PARAM};
use crate::error::AppError;
use crate::session::interface::VkSession;
use crate::transport::model::ApiEnvelope;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Form parameters of a single VK method call.
pub type Params = Vec<(&'static str, String)>;

/// Transport used by the remote client to reach the VK API.
#[async_trait]
pub trait VkHttpClient: Send + Sync {
    /// Calls `method` and unwraps the `response` member of the envelope.
    async fn call<T: DeserializeOwned + Debug + Send>(
        &self,
        method: &str,
        session: &VkSession,
        params: Params,
    ) -> Result<T, AppError>;

    /// Posts a file as multipart `field` to an upload target handed out by the API.
    async fn upload<T: DeserializeOwned + Debug + Send>(
        &self,
        upload_url: &str,
        field: &str,
        path: &Path,
    ) -> Result<T, AppError>;
}

/// Represents the HTTP client for interacting with the VK API.
#[derive(Debug)]
pub struct VkHttpClientImpl {
    client: Client,
    base_url: String,
}

impl VkHttpClientImpl {
    /// Creates a new instance of the VkHttpClientImpl.
    ///
    /// # Arguments
    ///
    /// * `config` - REST settings: method base URL and request timeout.
    ///
    /// # Returns
    ///
    /// A Result containing the client or the builder error.
    pub fn new(config: &RestApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn handle_response<T: DeserializeOwned + Debug>(
        response: Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response Status: {}", status);
        debug!("Response Body: {}", body_text);

        if status.is_success() {
            let body: T = serde_json::from_str(&body_text)?;
            Ok(body)
        } else {
            error!(
                "API request failed. Status: {}, Body: {}",
                status, body_text
            );
            Err(AppError::Unexpected(status))
        }
    }
}

#[async_trait]
impl VkHttpClient for VkHttpClientImpl {
    #[instrument(skip(self, session, params))]
    async fn call<T: DeserializeOwned + Debug + Send>(
        &self,
        method: &str,
        session: &VkSession,
        params: Params,
    ) -> Result<T, AppError> {
        let url = self.method_url(method);
        debug!("Sending POST request to {}", url);

        let mut form = params;
        form.push((ACCESS_TOKEN_PARAM, session.access_token.clone()));
        form.push((VERSION_PARAM, session.api_version.clone()));

        let response = match self.client.post(&url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to send {} request: {:?}", method, e);
                return Err(e.into());
            }
        };

        let envelope: ApiEnvelope<T> = Self::handle_response(response).await?;
        envelope.into_result(method)
    }

    #[instrument(skip(self, upload_url))]
    async fn upload<T: DeserializeOwned + Debug + Send>(
        &self,
        upload_url: &str,
        field: &str,
        path: &Path,
    ) -> Result<T, AppError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let form = Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name));
        let response = self.client.post(upload_url).multipart(form).send().await?;

        Self::handle_response(response).await
    }
}
