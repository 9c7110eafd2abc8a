use crate::error::{EmbeddingError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vector width of the default corpus model (text-embedding-3-large).
pub const DEFAULT_DIMENSION: usize = 3072;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-large";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
}

impl EmbeddingConfig {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

/// Client for an OpenAI-compatible embeddings endpoint.
///
/// Query text in, one dense vector out. Failures map onto the engine's
/// error taxonomy and are never retried here; the caller decides what a
/// failed embedding means for its request.
#[derive(Clone, Debug)]
pub struct EmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(EmbeddingError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        let auth = HeaderValue::from_str(&auth)
            .map_err(|_| EmbeddingError::MissingApiKey)?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model,
            dimension: config.dimension,
        })
    }

    /// Vector width this client requests from the service.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed one query text into a dense vector of `dimension()` floats.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        log::debug!("Embedding query ({} chars)", text.len());

        let request = EmbeddingRequest {
            model: &self.model,
            input: [text],
            dimensions: self.dimension,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse("response contained no embedding".to_string())
            })?;

        if vector.len() != self.dimension {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} dims, got {}",
                self.dimension,
                vector.len()
            )));
        }

        Ok(vector)
    }
}

fn classify_transport_error(err: reqwest::Error) -> EmbeddingError {
    if err.is_timeout() {
        EmbeddingError::Timeout
    } else {
        EmbeddingError::Http(err)
    }
}

fn classify_status(status: StatusCode, body: String) -> EmbeddingError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::AuthFailed {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => EmbeddingError::Timeout,
        _ => EmbeddingError::Unexpected {
            status: status.as_u16(),
            body,
        },
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
