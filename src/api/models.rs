//! Wire structures exchanged with the agents backend.
//!
//! Field names follow the backend's JSON (`_id`, `document_count`,
//! `retrieved_sources`, ...); the Rust side uses snake_case names throughout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ApiError;

/// File extensions the upload picker advertises. The server has the final say.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "xlsx", "pptx"];

/// One row of `GET /agents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub document_count: usize,
}

/// A document attached to an agent. `file_name` is unique within its agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub uploaded_at: String,
}

/// Full agent record returned by `GET /agents/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDetails {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl AgentDetails {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn has_document(&self, file_name: &str) -> bool {
        self.documents.iter().any(|doc| doc.file_name == file_name)
    }
}

/// Body of `POST /agents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub prompt: String,
}

/// Body of `PUT /agents/{id}`; omitted fields are left unchanged server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AgentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.prompt.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatQuery<'a> {
    pub query: &'a str,
}

/// Answer of `POST /agents/{id}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub retrieved_sources: Vec<String>,
}

/// Only the identifier is read from the create response, and only if present.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreatedAgent {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
}

impl CreatedAgent {
    /// Extracts the new id from a create response of any shape.
    pub fn id_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<CreatedAgent>(body)
            .ok()
            .and_then(|created| created.id)
            .filter(|id| !id.is_empty())
    }
}

/// A local file ready to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Reads `path` from disk, naming the upload after the path's base name.
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(upload_name(path), bytes))
    }
}

/// Base name used for an upload of `path`.
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

pub fn is_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
