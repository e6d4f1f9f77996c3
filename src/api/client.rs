use crate::api::models::{ChatResponse, RequestBody};
use crate::config::Config;
use crate::error::{DeskmateError, Result};
use crate::models::Message;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// The seam the conversation loop talks to the model backend through.
/// Stateless; one call per iteration, full history every time.
pub trait ChatBackend: Send + Sync {
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
                DeskmateError::ConfigError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            model: config.model.clone(),
        })
    }

    async fn send(&self, messages: &[Message]) -> Result<String> {
        let body = RequestBody {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: false,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DeskmateError::ApiError { status, message });
        }

        let parsed: ChatResponse = response.json().await?;

        if let Some(error) = parsed.error {
            return Err(DeskmateError::ApiError {
                status: 200,
                message: error.to_string(),
            });
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| DeskmateError::Other("No assistant content in response".to_string()))
    }
}

impl ChatBackend for HttpGateway {
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.send(messages))
    }
}
