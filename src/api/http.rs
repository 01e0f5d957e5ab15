use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::models::{ChatQuery, CreatedAgent};
use super::{
    AgentApi, AgentDetails, AgentSummary, AgentUpdate, ApiError, ChatReply, NewAgent, UploadFile,
};
use crate::config::ApiSettings;

/// `AgentApi` over HTTP/JSON, built once at startup from [`ApiSettings`].
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: Url,
    client: Client,
}

impl HttpApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let base_url = Url::parse(settings.base_url.trim())
            .with_context(|| format!("invalid API base URL: {}", settings.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry paths: {}", base_url));
        }

        let mut builder = Client::builder().default_headers(build_headers(settings)?);
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// A trailing empty segment yields a trailing slash (`/agents/`).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Decode(format!("base URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            warn!("backend answered {}: {}", status, body.trim());
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn build_headers(settings: &ApiSettings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (key, value) in settings.headers.iter() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .with_context(|| format!("invalid header name: {}", key))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for header {}", key))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl AgentApi for HttpApiClient {
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, ApiError> {
        let url = self.endpoint(&["agents", ""])?;
        debug!("GET {}", url);
        self.execute_json(self.client.get(url)).await
    }

    async fn create_agent(&self, agent: &NewAgent) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["agents", ""])?;
        debug!("POST {}", url);
        let body = self.execute(self.client.post(url).json(agent)).await?;
        let id = CreatedAgent::id_from_body(&body);
        if id.is_none() {
            debug!("create response carried no agent id");
        }
        Ok(id)
    }

    async fn get_agent(&self, agent_id: &str) -> Result<AgentDetails, ApiError> {
        let url = self.endpoint(&["agents", agent_id])?;
        debug!("GET {}", url);
        self.execute_json(self.client.get(url)).await
    }

    async fn update_agent(&self, agent_id: &str, changes: &AgentUpdate) -> Result<(), ApiError> {
        let url = self.endpoint(&["agents", agent_id])?;
        debug!("PUT {}", url);
        self.execute(self.client.put(url).json(changes))
            .await
            .map(|_| ())
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["agents", agent_id])?;
        debug!("DELETE {}", url);
        self.execute(self.client.delete(url)).await.map(|_| ())
    }

    async fn upload_document(&self, agent_id: &str, file: UploadFile) -> Result<(), ApiError> {
        let url = self.endpoint(&["agents", agent_id, "documents"])?;
        debug!("POST {} ({}, {} bytes)", url, file.file_name, file.bytes.len());
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(file.mime_type)?;
        let form = Form::new().part("file", part);
        self.execute(self.client.post(url).multipart(form))
            .await
            .map(|_| ())
    }

    async fn delete_document(&self, agent_id: &str, file_name: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["agents", agent_id, "documents", file_name])?;
        debug!("DELETE {}", url);
        self.execute(self.client.delete(url)).await.map(|_| ())
    }

    async fn chat(&self, agent_id: &str, query: &str) -> Result<ChatReply, ApiError> {
        let url = self.endpoint(&["agents", agent_id, "chat"])?;
        debug!("POST {} ({} chars)", url, query.chars().count());
        self.execute_json(self.client.post(url).json(&ChatQuery { query }))
            .await
    }
}
