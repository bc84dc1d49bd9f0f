use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};

use console_logging::console_debug;

use crate::types::{ChatRequest, HealthReply};
use crate::{ChatReply, ClientSettings, FailureKind, RequestError};

/// The remote adaptive RAG pipeline.
#[async_trait::async_trait]
pub trait PipelineClient: Send + Sync {
    /// `POST /upload` with the document as multipart field `file`.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), RequestError>;

    /// `POST /chat` with `{ "query": text }`.
    async fn query(&self, text: &str) -> Result<ChatReply, RequestError>;

    /// `GET /`, returning the backend's status line.
    async fn health(&self) -> Result<String, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPipelineClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestPipelineClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>, RequestError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl PipelineClient for ReqwestPipelineClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), RequestError> {
        let url = self.endpoint("upload")?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(&response)?;
        console_debug!("Upload of {} accepted", file_name);
        Ok(())
    }

    async fn query(&self, text: &str) -> Result<ChatReply, RequestError> {
        let url = self.endpoint("chat")?;
        let body = serde_json::to_vec(&ChatRequest { query: text })
            .map_err(|err| RequestError::new(FailureKind::MalformedBody, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(&response)?;

        let bytes = self.read_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::new(FailureKind::MalformedBody, err.to_string()))
    }

    async fn health(&self) -> Result<String, RequestError> {
        let url = self.endpoint("")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        ensure_success(&response)?;

        let bytes = self.read_body(response).await?;
        let reply: HealthReply = serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::new(FailureKind::MalformedBody, err.to_string()))?;
        Ok(reply.status)
    }
}

fn ensure_success(response: &Response) -> Result<(), RequestError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(RequestError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
