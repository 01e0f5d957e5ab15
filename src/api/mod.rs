//! Typed access to the agents backend.
//!
//! Every backend capability is one method on [`AgentApi`]. Views receive the
//! client as a [`SharedApi`] handle instead of reaching for a global, which is
//! also how tests swap in a double.

use std::sync::Arc;

use async_trait::async_trait;

mod error;
pub mod http;
#[cfg(test)]
pub(crate) mod mock;
mod models;

pub use error::{ApiError, ErrorKind};
pub use http::HttpApiClient;
pub use models::{
    ACCEPTED_EXTENSIONS, AgentDetails, AgentSummary, AgentUpdate, ChatReply, Document, NewAgent,
    UploadFile, is_accepted_extension, upload_name,
};

/// Shared handle injected into every view.
pub type SharedApi = Arc<dyn AgentApi>;

/// Request/response mapping for each backend operation.
///
/// Implementations never retry and never cache; each call is independent.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// `GET /agents/`
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, ApiError>;

    /// `POST /agents/`. Any 2xx is success; the new identifier is returned
    /// when the response body carries one.
    async fn create_agent(&self, agent: &NewAgent) -> Result<Option<String>, ApiError>;

    /// `GET /agents/{id}`. Unknown ids fail with [`ApiError::NotFound`].
    async fn get_agent(&self, agent_id: &str) -> Result<AgentDetails, ApiError>;

    /// `PUT /agents/{id}` with partial semantics. The response body is not
    /// read; callers re-fetch the agent.
    async fn update_agent(&self, agent_id: &str, changes: &AgentUpdate) -> Result<(), ApiError>;

    /// `DELETE /agents/{id}`
    async fn delete_agent(&self, agent_id: &str) -> Result<(), ApiError>;

    /// `POST /agents/{id}/documents` as a multipart body.
    async fn upload_document(&self, agent_id: &str, file: UploadFile) -> Result<(), ApiError>;

    /// `DELETE /agents/{id}/documents/{file_name}`
    async fn delete_document(&self, agent_id: &str, file_name: &str) -> Result<(), ApiError>;

    /// `POST /agents/{id}/chat`
    async fn chat(&self, agent_id: &str, query: &str) -> Result<ChatReply, ApiError>;
}
