//! In-memory `AgentApi` double used by the view tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{
    AgentApi, AgentDetails, AgentSummary, AgentUpdate, ApiError, ChatReply, Document, NewAgent,
    UploadFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Get,
    Update,
    DeleteAgent,
    Upload,
    DeleteDocument,
    Chat,
}

#[derive(Default)]
struct State {
    agents: Vec<AgentDetails>,
    calls: Vec<(Op, String)>,
    failing: HashSet<Op>,
    replies: Vec<ChatReply>,
    next_id: u32,
    held: HashMap<Op, Arc<Semaphore>>,
    armed: HashSet<Op>,
}

/// Backend double holding agents in memory.
///
/// Operations listed through [`MockApi::fail`] answer with a 500. When a chat
/// gate is installed, chat calls wait for [`MockApi::release_chat`]. A fetch
/// marked with [`MockApi::hold_next`] answers with the data it saw when it was
/// called, but only once [`MockApi::release`] lets it through.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
    chat_gate: Option<Arc<Semaphore>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(self, id: &str, name: &str, prompt: &str, documents: &[&str]) -> Self {
        self.state.lock().unwrap().agents.push(AgentDetails {
            id: id.to_string(),
            name: name.to_string(),
            prompt: prompt.to_string(),
            documents: documents.iter().map(|name| document(name)).collect(),
        });
        self
    }

    pub fn with_chat_gate(mut self) -> Self {
        self.chat_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn fail(&self, op: Op) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().unwrap().failing.remove(&op);
    }

    pub fn queue_reply(&self, answer: &str, sources: &[&str]) {
        self.state.lock().unwrap().replies.push(ChatReply {
            answer: answer.to_string(),
            retrieved_sources: sources.iter().map(|s| s.to_string()).collect(),
        });
    }

    /// The next `op` call snapshots its answer and then waits for [`release`](Self::release).
    pub fn hold_next(&self, op: Op) {
        let mut state = self.state.lock().unwrap();
        state.held.insert(op, Arc::new(Semaphore::new(0)));
        state.armed.insert(op);
    }

    pub fn release(&self, op: Op) {
        if let Some(gate) = self.state.lock().unwrap().held.get(&op) {
            gate.add_permits(1);
        }
    }

    /// Yields until `op` has been called at least `count` times.
    pub async fn wait_for_calls(&self, op: Op, count: usize) {
        while self.calls(op) < count {
            tokio::task::yield_now().await;
        }
    }

    pub fn release_chat(&self) {
        if let Some(gate) = &self.chat_gate {
            gate.add_permits(1);
        }
    }

    /// Replaces the document list server-side without going through the API.
    pub fn set_documents(&self, agent_id: &str, documents: &[&str]) {
        let mut state = self.state.lock().unwrap();
        if let Some(agent) = state.agents.iter_mut().find(|a| a.id == agent_id) {
            agent.documents = documents.iter().map(|name| document(name)).collect();
        }
    }

    pub fn calls(&self, op: Op) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(call, _)| *call == op)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn last_argument(&self, op: Op) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|(call, _)| *call == op)
            .map(|(_, arg)| arg.clone())
    }

    /// Takes the hold installed for `op`, if this call is the one to block.
    fn take_hold(&self, op: Op) -> Option<Arc<Semaphore>> {
        let mut state = self.state.lock().unwrap();
        if !state.armed.remove(&op) {
            return None;
        }
        state.held.get(&op).cloned()
    }

    async fn wait_on(gate: Option<Arc<Semaphore>>) {
        if let Some(gate) = gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }

    fn record(&self, op: Op, argument: impl Into<String>) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((op, argument.into()));
        if state.failing.contains(&op) {
            Err(ApiError::Fault {
                status: 500,
                detail: format!("{op:?} failed"),
            })
        } else {
            Ok(())
        }
    }
}

fn document(name: &str) -> Document {
    Document {
        file_name: name.to_string(),
        url: format!("https://storage.local/{name}"),
        uploaded_at: "2024-05-01T10:00:00".to_string(),
    }
}

#[async_trait]
impl AgentApi for MockApi {
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, ApiError> {
        let gate = self.take_hold(Op::List);
        self.record(Op::List, "")?;
        let agents = self
            .state
            .lock()
            .unwrap()
            .agents
            .iter()
            .map(|agent| AgentSummary {
                id: agent.id.clone(),
                name: agent.name.clone(),
                document_count: agent.documents.len(),
            })
            .collect();
        Self::wait_on(gate).await;
        Ok(agents)
    }

    async fn create_agent(&self, agent: &NewAgent) -> Result<Option<String>, ApiError> {
        self.record(Op::Create, format!("{}|{}", agent.name, agent.prompt))?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("new-{}", state.next_id);
        state.agents.push(AgentDetails {
            id: id.clone(),
            name: agent.name.clone(),
            prompt: agent.prompt.clone(),
            documents: Vec::new(),
        });
        Ok(Some(id))
    }

    async fn get_agent(&self, agent_id: &str) -> Result<AgentDetails, ApiError> {
        let gate = self.take_hold(Op::Get);
        self.record(Op::Get, agent_id)?;
        let agent = self
            .state
            .lock()
            .unwrap()
            .agents
            .iter()
            .find(|agent| agent.id == agent_id)
            .cloned();
        Self::wait_on(gate).await;
        agent.ok_or(ApiError::NotFound)
    }

    async fn update_agent(&self, agent_id: &str, changes: &AgentUpdate) -> Result<(), ApiError> {
        self.record(
            Op::Update,
            format!(
                "{}|{}|{}",
                agent_id,
                changes.name.clone().unwrap_or_default(),
                changes.prompt.clone().unwrap_or_default()
            ),
        )?;
        let mut state = self.state.lock().unwrap();
        let agent = state
            .agents
            .iter_mut()
            .find(|agent| agent.id == agent_id)
            .ok_or(ApiError::NotFound)?;
        if let Some(name) = &changes.name {
            agent.name = name.clone();
        }
        if let Some(prompt) = &changes.prompt {
            agent.prompt = prompt.clone();
        }
        Ok(())
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), ApiError> {
        self.record(Op::DeleteAgent, agent_id)?;
        let mut state = self.state.lock().unwrap();
        let before = state.agents.len();
        state.agents.retain(|agent| agent.id != agent_id);
        if state.agents.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn upload_document(&self, agent_id: &str, file: UploadFile) -> Result<(), ApiError> {
        self.record(Op::Upload, file.file_name.clone())?;
        let mut state = self.state.lock().unwrap();
        let agent = state
            .agents
            .iter_mut()
            .find(|agent| agent.id == agent_id)
            .ok_or(ApiError::NotFound)?;
        agent.documents.push(document(&file.file_name));
        Ok(())
    }

    async fn delete_document(&self, agent_id: &str, file_name: &str) -> Result<(), ApiError> {
        self.record(Op::DeleteDocument, file_name)?;
        let mut state = self.state.lock().unwrap();
        let agent = state
            .agents
            .iter_mut()
            .find(|agent| agent.id == agent_id)
            .ok_or(ApiError::NotFound)?;
        let before = agent.documents.len();
        agent.documents.retain(|doc| doc.file_name != file_name);
        if agent.documents.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn chat(&self, agent_id: &str, query: &str) -> Result<ChatReply, ApiError> {
        let recorded = self.record(Op::Chat, format!("{agent_id}|{query}"));
        if let Some(gate) = &self.chat_gate {
            let permit = gate.acquire().await.map_err(|_| ApiError::Decode("gate closed".into()))?;
            permit.forget();
        }
        recorded?;
        let mut state = self.state.lock().unwrap();
        if state.replies.is_empty() {
            return Ok(ChatReply {
                answer: format!("eco: {query}"),
                retrieved_sources: Vec::new(),
            });
        }
        Ok(state.replies.remove(0))
    }
}
