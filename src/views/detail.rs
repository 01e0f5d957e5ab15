//! Agent detail and chat screen state.
//!
//! The displayed agent is always the last successful fetch: every mutation
//! (upload, document delete, edit) is followed by a full re-fetch rather than
//! a local patch. The transcript is the only client-owned state and is reset
//! whenever a different agent is loaded.

use std::path::PathBuf;

use log::{debug, error, info, warn};

use super::Requests;
use super::chat::{MessageId, Transcript};
use super::composer::Composer;
use super::form::{AgentDraft, AgentForm, FormSignal};
use super::notice::Notices;
use crate::api::{
    AgentDetails, ApiError, ChatReply, SharedApi, UploadFile, is_accepted_extension, upload_name,
};

pub const DETAIL_LOAD_FAILED: &str = "No se pudieron cargar los detalles del agente.";
pub const CHAT_FAILED: &str = "Error al contactar al agente.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentLoad {
    Loading,
    Loaded(AgentDetails),
    NotFound,
    Failed(String),
}

/// Raised to the application when the outcome concerns other screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailSignal {
    AgentUpdated { agent_id: String },
    /// The agent no longer exists; the detail screen must be left.
    AgentDeleted { agent_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent(MessageId),
    Blank,
    InFlight,
    NotLoaded,
}

enum DetailEvent {
    Fetched {
        seq: u64,
        result: Result<AgentDetails, ApiError>,
    },
    ChatSettled {
        pending: MessageId,
        result: Result<ChatReply, ApiError>,
    },
    Uploaded {
        file_name: String,
        result: Result<(), ApiError>,
    },
    DocumentDeleted {
        file_name: String,
        result: Result<(), ApiError>,
    },
    AgentDeleted {
        name: String,
        result: Result<(), ApiError>,
    },
}

pub struct AgentDetailView {
    api: SharedApi,
    agent_id: String,
    load: AgentLoad,
    fetch_seq: u64,
    transcript: Transcript,
    input: Composer,
    chat_pending: Option<MessageId>,
    uploading: bool,
    deleting_document: Option<String>,
    deleting_agent: bool,
    selected_document: usize,
    edit_form: Option<AgentForm>,
    signals: Vec<DetailSignal>,
    requests: Requests<DetailEvent>,
}

impl AgentDetailView {
    pub fn open(api: SharedApi, agent_id: impl Into<String>) -> Self {
        let mut view = Self {
            api,
            agent_id: String::new(),
            load: AgentLoad::Loading,
            fetch_seq: 0,
            transcript: Transcript::new(),
            input: Composer::new(),
            chat_pending: None,
            uploading: false,
            deleting_document: None,
            deleting_agent: false,
            selected_document: 0,
            edit_form: None,
            signals: Vec::new(),
            requests: Requests::new(),
        };
        view.load(agent_id);
        view
    }

    /// Switches to `agent_id`: everything tied to the previous agent is
    /// cancelled and the transcript starts over.
    pub fn load(&mut self, agent_id: impl Into<String>) {
        self.requests.cancel_all();
        self.agent_id = agent_id.into();
        info!("loading agent {}", self.agent_id);
        self.load = AgentLoad::Loading;
        self.transcript.reset();
        self.input.clear();
        self.chat_pending = None;
        self.uploading = false;
        self.deleting_document = None;
        self.deleting_agent = false;
        self.selected_document = 0;
        self.edit_form = None;
        self.signals.clear();
        self.refresh();
    }

    /// Re-fetches the agent. The current snapshot stays on screen meanwhile.
    pub fn refresh(&mut self) {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        let api = self.api.clone();
        let agent_id = self.agent_id.clone();
        debug!("fetching agent {} (seq {})", agent_id, seq);
        self.requests.spawn(async move {
            let result = api.get_agent(&agent_id).await;
            DetailEvent::Fetched { seq, result }
        });
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn load_state(&self) -> &AgentLoad {
        &self.load
    }

    pub fn agent(&self) -> Option<&AgentDetails> {
        match &self.load {
            AgentLoad::Loaded(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn input(&self) -> &Composer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Composer {
        &mut self.input
    }

    pub fn is_sending(&self) -> bool {
        self.chat_pending.is_some()
    }

    pub fn can_send(&self) -> bool {
        self.agent().is_some() && !self.is_sending() && !self.input.is_blank()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_deleting_document(&self) -> bool {
        self.deleting_document.is_some()
    }

    pub fn is_deleting_agent(&self) -> bool {
        self.deleting_agent
    }

    pub fn in_flight(&self) -> bool {
        !self.requests.is_idle()
            || self
                .edit_form
                .as_ref()
                .is_some_and(|form| form.is_submitting())
    }

    pub fn selected_document_index(&self) -> usize {
        self.selected_document
    }

    pub fn selected_document(&self) -> Option<&str> {
        self.agent()
            .and_then(|agent| agent.documents.get(self.selected_document))
            .map(|doc| doc.file_name.as_str())
    }

    pub fn move_document_selection(&mut self, delta: isize) {
        let len = self.agent().map_or(0, |agent| agent.documents.len());
        if len == 0 {
            self.selected_document = 0;
            return;
        }
        let next = self.selected_document as isize + delta;
        self.selected_document = next.clamp(0, len as isize - 1) as usize;
    }

    /// Sends the chat input. The user message is shown immediately and the
    /// input cleared; a failed round trip retracts the message again.
    pub fn send_message(&mut self) -> SendOutcome {
        if self.chat_pending.is_some() {
            return SendOutcome::InFlight;
        }
        if self.input.is_blank() {
            return SendOutcome::Blank;
        }
        if self.agent().is_none() {
            return SendOutcome::NotLoaded;
        }
        let query = self.input.take();
        let pending = self.transcript.push_user(query.clone());
        self.chat_pending = Some(pending);

        let api = self.api.clone();
        let agent_id = self.agent_id.clone();
        debug!("chat request to {} (message {})", agent_id, pending.value());
        self.requests.spawn(async move {
            let result = api.chat(&agent_id, &query).await;
            DetailEvent::ChatSettled { pending, result }
        });
        SendOutcome::Sent(pending)
    }

    /// Reads and uploads a local file. Returns false while another upload
    /// is outstanding.
    pub fn upload_document(&mut self, path: PathBuf, notices: &mut Notices) -> bool {
        if self.uploading {
            return false;
        }
        if !is_accepted_extension(&path) {
            warn!(
                "uploading {} with an extension the server may reject",
                path.display()
            );
        }
        let file_name = upload_name(&path);
        notices.info("Subiendo documento...", file_name.clone());
        self.uploading = true;

        let api = self.api.clone();
        let agent_id = self.agent_id.clone();
        self.requests.spawn(async move {
            let result = match UploadFile::read(&path).await {
                Ok(file) => api.upload_document(&agent_id, file).await,
                Err(err) => Err(err),
            };
            DetailEvent::Uploaded { file_name, result }
        });
        true
    }

    pub fn delete_document(&mut self, file_name: impl Into<String>) -> bool {
        if self.deleting_document.is_some() {
            return false;
        }
        let file_name = file_name.into();
        self.deleting_document = Some(file_name.clone());

        let api = self.api.clone();
        let agent_id = self.agent_id.clone();
        self.requests.spawn(async move {
            let result = api.delete_document(&agent_id, &file_name).await;
            DetailEvent::DocumentDeleted { file_name, result }
        });
        true
    }

    pub fn delete_agent(&mut self) -> bool {
        if self.deleting_agent {
            return false;
        }
        self.deleting_agent = true;
        let name = self
            .agent()
            .map(|agent| agent.name.clone())
            .unwrap_or_else(|| self.agent_id.clone());

        let api = self.api.clone();
        let agent_id = self.agent_id.clone();
        self.requests.spawn(async move {
            let result = api.delete_agent(&agent_id).await;
            DetailEvent::AgentDeleted { name, result }
        });
        true
    }

    /// Opens the edit form pre-filled with the current server snapshot.
    pub fn open_edit(&mut self) -> bool {
        let Some(agent) = self.agent() else {
            return false;
        };
        let draft = AgentDraft::new(agent.name.clone(), agent.prompt.clone());
        match &mut self.edit_form {
            Some(form) if form.is_submitting() => return false,
            Some(form) => {
                if !form.is_open() {
                    form.set_defaults(draft);
                }
            }
            None => {
                self.edit_form = Some(AgentForm::edit(
                    self.api.clone(),
                    self.agent_id.clone(),
                    draft,
                ));
            }
        }
        if let Some(form) = &mut self.edit_form {
            form.open();
        }
        true
    }

    pub fn edit_form(&self) -> Option<&AgentForm> {
        self.edit_form.as_ref().filter(|form| form.is_open())
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut AgentForm> {
        self.edit_form.as_mut().filter(|form| form.is_open())
    }

    /// Applies everything that settled since the last tick.
    pub fn poll(&mut self, notices: &mut Notices) -> Vec<DetailSignal> {
        for event in self.requests.ready() {
            self.apply(event, notices);
        }
        if let Some(form) = &mut self.edit_form {
            let signal = form.poll(notices);
            self.on_form_signal(signal);
        }
        self.release_stranded(notices);
        self.take_signals()
    }

    /// Waits for the next outstanding request and applies it. Returns false
    /// when nothing was in flight.
    pub async fn settle(&mut self, notices: &mut Notices) -> bool {
        if let Some(form) = self.edit_form.as_mut()
            && form.is_submitting()
        {
            let signal = form.settle(notices).await;
            self.on_form_signal(signal);
            return true;
        }
        match self.requests.next().await {
            Some(event) => {
                self.apply(event, notices);
                self.release_stranded(notices);
                true
            }
            None => false,
        }
    }

    pub fn take_signals(&mut self) -> Vec<DetailSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn teardown(&mut self) {
        debug!("tearing down detail view for {}", self.agent_id);
        self.requests.cancel_all();
        self.edit_form = None;
        self.chat_pending = None;
        self.uploading = false;
        self.deleting_document = None;
        self.deleting_agent = false;
    }

    fn on_form_signal(&mut self, signal: Option<FormSignal>) {
        if let Some(FormSignal::Updated { agent_id }) = signal {
            self.refresh();
            self.signals.push(DetailSignal::AgentUpdated { agent_id });
        }
    }

    /// A request task that died without settling must not leave a busy flag
    /// or a speculative message behind.
    fn release_stranded(&mut self, notices: &mut Notices) {
        if !self.requests.is_idle() {
            return;
        }
        if let Some(pending) = self.chat_pending.take() {
            self.transcript.retract(pending);
            notices.error(CHAT_FAILED);
        }
        self.uploading = false;
        self.deleting_document = None;
        self.deleting_agent = false;
    }

    fn apply(&mut self, event: DetailEvent, notices: &mut Notices) {
        match event {
            DetailEvent::Fetched { seq, result } => self.apply_fetch(seq, result, notices),
            DetailEvent::ChatSettled { pending, result } => {
                self.chat_pending = None;
                match result {
                    Ok(reply) => {
                        debug!(
                            "agent answered message {} with {} sources",
                            pending.value(),
                            reply.retrieved_sources.len()
                        );
                        self.transcript.push_agent(reply);
                    }
                    Err(err) => {
                        error!("chat with agent {} failed: {}", self.agent_id, err);
                        self.transcript.retract(pending);
                        notices.error(CHAT_FAILED);
                    }
                }
            }
            DetailEvent::Uploaded { file_name, result } => {
                self.uploading = false;
                match result {
                    Ok(()) => {
                        info!("uploaded {} to {}", file_name, self.agent_id);
                        notices.success("Documento subido con éxito.");
                        self.refresh();
                    }
                    Err(err) => {
                        error!("error uploading {}: {}", file_name, err);
                        notices.error("Error al subir el documento.");
                    }
                }
            }
            DetailEvent::DocumentDeleted { file_name, result } => {
                self.deleting_document = None;
                match result {
                    Ok(()) => {
                        info!("deleted document {} from {}", file_name, self.agent_id);
                        notices.success(format!("Documento \"{}\" eliminado.", file_name));
                        self.refresh();
                    }
                    Err(err) => {
                        error!("error deleting document {}: {}", file_name, err);
                        notices.error("Error al eliminar el documento.");
                    }
                }
            }
            DetailEvent::AgentDeleted { name, result } => {
                self.deleting_agent = false;
                match result {
                    Ok(()) => {
                        info!("deleted agent {}", self.agent_id);
                        notices.success(format!("Agente \"{}\" eliminado con éxito.", name));
                        self.signals.push(DetailSignal::AgentDeleted {
                            agent_id: self.agent_id.clone(),
                        });
                    }
                    Err(err) => {
                        error!("error deleting agent {}: {}", self.agent_id, err);
                        notices.error("Error al eliminar el agente.");
                    }
                }
            }
        }
    }

    fn apply_fetch(
        &mut self,
        seq: u64,
        result: Result<AgentDetails, ApiError>,
        notices: &mut Notices,
    ) {
        if seq != self.fetch_seq {
            debug!("dropping superseded fetch of {} (seq {})", self.agent_id, seq);
            return;
        }
        match result {
            Ok(agent) => {
                debug!(
                    "agent {} loaded with {} documents",
                    agent.id,
                    agent.document_count()
                );
                self.selected_document = self
                    .selected_document
                    .min(agent.documents.len().saturating_sub(1));
                self.load = AgentLoad::Loaded(agent);
            }
            Err(err) if err.is_not_found() => {
                warn!("agent {} not found", self.agent_id);
                self.load = AgentLoad::NotFound;
            }
            Err(err) => {
                error!("error fetching agent {}: {}", self.agent_id, err);
                notices.error(DETAIL_LOAD_FAILED);
                if !matches!(self.load, AgentLoad::Loaded(_)) {
                    self.load = AgentLoad::Failed(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AgentApi;
    use crate::api::mock::{MockApi, Op};
    use crate::views::chat::Sender;
    use crate::views::form::{FormField, Submit};
    use std::sync::Arc;

    async fn loaded(api: &Arc<MockApi>, notices: &mut Notices) -> AgentDetailView {
        let mut view = AgentDetailView::open(api.clone(), "a1");
        assert!(view.settle(notices).await);
        assert!(view.agent().is_some());
        view
    }

    async fn drain(view: &mut AgentDetailView, notices: &mut Notices) {
        while view.settle(notices).await {}
    }

    fn type_input(view: &mut AgentDetailView, text: &str) {
        for ch in text.chars() {
            view.input_mut().insert_char(ch);
        }
    }

    fn document_names(view: &AgentDetailView) -> Vec<String> {
        view.agent()
            .map(|agent| agent.documents.iter().map(|d| d.file_name.clone()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn successful_sends_alternate_user_and_agent() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &[]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        for n in 1..=3 {
            type_input(&mut view, &format!("pregunta {n}"));
            assert!(matches!(view.send_message(), SendOutcome::Sent(_)));
            assert!(view.input().is_empty());
            drain(&mut view, &mut notices).await;
            assert_eq!(view.transcript().len(), 2 * n);
        }
        let senders: Vec<Sender> = view.transcript().messages().iter().map(|m| m.sender).collect();
        for (index, sender) in senders.iter().enumerate() {
            let expected = if index % 2 == 0 { Sender::User } else { Sender::Agent };
            assert_eq!(*sender, expected);
        }
        assert_eq!(view.transcript().messages()[1].text, "eco: pregunta 1");
    }

    #[tokio::test]
    async fn failed_chat_retracts_the_question() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &[]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;
        type_input(&mut view, "uno");
        view.send_message();
        drain(&mut view, &mut notices).await;
        let before = view.transcript().messages().to_vec();

        api.fail(Op::Chat);
        type_input(&mut view, "dos");
        view.send_message();
        assert_eq!(view.transcript().len(), 3);
        drain(&mut view, &mut notices).await;

        assert_eq!(view.transcript().messages(), before.as_slice());
        assert!(!view.is_sending());
        assert!(notices.contains(CHAT_FAILED));
    }

    #[tokio::test]
    async fn only_one_chat_request_is_outstanding() {
        let api = MockApi::new()
            .with_agent("a1", "Bot", "p", &[])
            .with_chat_gate()
            .shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        type_input(&mut view, "hola");
        assert!(matches!(view.send_message(), SendOutcome::Sent(_)));
        type_input(&mut view, "otra");
        assert!(!view.can_send());
        assert_eq!(view.send_message(), SendOutcome::InFlight);
        tokio::task::yield_now().await;
        assert_eq!(api.calls(Op::Chat), 1);
        assert_eq!(view.input().buffer(), "otra");

        api.release_chat();
        drain(&mut view, &mut notices).await;
        assert!(view.can_send());
        assert!(matches!(view.send_message(), SendOutcome::Sent(_)));
        api.release_chat();
        drain(&mut view, &mut notices).await;
        assert_eq!(api.calls(Op::Chat), 2);
        assert_eq!(view.transcript().len(), 4);
    }

    #[tokio::test]
    async fn blank_input_is_not_sent() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &[]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;
        type_input(&mut view, "   ");
        assert_eq!(view.send_message(), SendOutcome::Blank);
        assert!(view.transcript().is_empty());
        assert_eq!(api.calls(Op::Chat), 0);
    }

    #[tokio::test]
    async fn upload_shows_the_refetched_server_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let api = MockApi::new().with_agent("a1", "Bot", "p", &["viejo.pdf"]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        assert!(view.upload_document(path.clone(), &mut notices));
        assert!(view.is_uploading());
        assert!(!view.upload_document(path, &mut notices));
        assert!(notices.contains("Subiendo documento..."));

        assert!(view.settle(&mut notices).await);
        assert!(!view.is_uploading());
        assert_eq!(api.last_argument(Op::Upload).as_deref(), Some("manual.pdf"));
        // The view shows whatever the server holds, not what was uploaded.
        api.set_documents("a1", &["servidor.docx"]);
        drain(&mut view, &mut notices).await;
        assert_eq!(document_names(&view), vec!["servidor.docx"]);
        assert!(notices.contains("Documento subido con éxito."));
    }

    #[tokio::test]
    async fn unreadable_upload_fails_without_a_request() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &[]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        view.upload_document(PathBuf::from("/no/existe/informe.pdf"), &mut notices);
        drain(&mut view, &mut notices).await;
        assert!(!view.is_uploading());
        assert_eq!(api.calls(Op::Upload), 0);
        assert!(notices.contains("Error al subir el documento."));
    }

    #[tokio::test]
    async fn document_delete_refetches_and_clears_busy_flag() {
        let api = MockApi::new()
            .with_agent("a1", "Bot", "p", &["a.pdf", "b.pdf"])
            .shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        assert!(view.delete_document("a.pdf"));
        assert!(view.is_deleting_document());
        assert!(!view.delete_document("b.pdf"));
        assert!(view.settle(&mut notices).await);
        assert!(!view.is_deleting_document());

        api.set_documents("a1", &["c.xlsx"]);
        drain(&mut view, &mut notices).await;
        assert_eq!(document_names(&view), vec!["c.xlsx"]);
        assert!(notices.contains("Documento \"a.pdf\" eliminado."));
        assert_eq!(api.calls(Op::Get), 2);
    }

    #[tokio::test]
    async fn failed_document_delete_keeps_snapshot() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &["a.pdf"]).shared();
        api.fail(Op::DeleteDocument);
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        view.delete_document("a.pdf");
        drain(&mut view, &mut notices).await;
        assert!(!view.is_deleting_document());
        assert_eq!(document_names(&view), vec!["a.pdf"]);
        assert_eq!(api.calls(Op::Get), 1);
        assert!(notices.contains("Error al eliminar el documento."));
    }

    #[tokio::test]
    async fn deleting_the_agent_signals_navigation() {
        let api = MockApi::new()
            .with_agent("a1", "Bot", "p", &[])
            .with_agent("a2", "Otro", "p", &[])
            .shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        assert!(view.delete_agent());
        assert!(view.is_deleting_agent());
        drain(&mut view, &mut notices).await;
        assert_eq!(
            view.take_signals(),
            vec![DetailSignal::AgentDeleted {
                agent_id: "a1".into()
            }]
        );
        assert_eq!(api.calls(Op::Get), 1);
        assert!(notices.contains("Agente \"Bot\" eliminado con éxito."));

        let remaining = api.list_agents().await.unwrap();
        assert!(remaining.iter().all(|agent| agent.id != "a1"));
    }

    #[tokio::test]
    async fn unknown_agent_is_not_found() {
        let api = MockApi::new().shared();
        let mut notices = Notices::default();
        let mut view = AgentDetailView::open(api, "fantasma");
        drain(&mut view, &mut notices).await;
        assert_eq!(view.load_state(), &AgentLoad::NotFound);
        assert_eq!(view.send_message(), SendOutcome::Blank);
    }

    #[tokio::test]
    async fn loading_another_agent_discards_the_late_reply() {
        let api = MockApi::new()
            .with_agent("a1", "Uno", "p", &[])
            .with_agent("a2", "Dos", "p", &[])
            .with_chat_gate()
            .shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;
        type_input(&mut view, "hola");
        view.send_message();

        view.load("a2");
        assert_eq!(view.load_state(), &AgentLoad::Loading);
        assert!(view.transcript().is_empty());
        api.release_chat();
        drain(&mut view, &mut notices).await;

        assert_eq!(view.agent().map(|a| a.name.as_str()), Some("Dos"));
        assert!(view.transcript().is_empty());
        assert!(!view.is_sending());
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn superseded_fetch_never_overwrites_newer_snapshot() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &["a.pdf"]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        api.hold_next(Op::Get);
        view.refresh();
        api.wait_for_calls(Op::Get, 2).await;
        api.set_documents("a1", &["b.pdf"]);
        view.refresh();
        assert!(view.settle(&mut notices).await);
        assert_eq!(document_names(&view), vec!["b.pdf"]);

        api.release(Op::Get);
        assert!(view.settle(&mut notices).await);
        assert_eq!(api.calls(Op::Get), 3);
        assert_eq!(document_names(&view), vec!["b.pdf"]);
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn failed_refetch_keeps_the_last_snapshot() {
        let api = MockApi::new().with_agent("a1", "Bot", "p", &["a.pdf"]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        api.fail(Op::Get);
        view.refresh();
        drain(&mut view, &mut notices).await;
        assert_eq!(document_names(&view), vec!["a.pdf"]);
        assert!(notices.contains(DETAIL_LOAD_FAILED));
    }

    #[tokio::test]
    async fn edit_form_saves_and_refetches() {
        let api = MockApi::new().with_agent("a1", "Bot", "viejo", &[]).shared();
        let mut notices = Notices::default();
        let mut view = loaded(&api, &mut notices).await;

        assert!(view.open_edit());
        let form = view.edit_form_mut().unwrap();
        form.field_mut(FormField::Prompt).set("  ");
        assert_eq!(form.submit(), Submit::Invalid);
        assert_eq!(api.calls(Op::Update), 0);

        form.field_mut(FormField::Prompt).set("nuevo");
        assert_eq!(form.submit(), Submit::Sent);
        drain(&mut view, &mut notices).await;

        assert!(view.edit_form().is_none());
        assert_eq!(view.agent().map(|a| a.prompt.as_str()), Some("nuevo"));
        assert_eq!(
            view.take_signals(),
            vec![DetailSignal::AgentUpdated {
                agent_id: "a1".into()
            }]
        );
        assert_eq!(api.calls(Op::Get), 2);
    }
}
