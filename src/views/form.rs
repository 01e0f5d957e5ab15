//! Creation and edit forms for an agent's name and prompt.

use log::{error, info, warn};

use super::Requests;
use super::composer::Composer;
use super::notice::Notices;
use crate::api::{AgentUpdate, ApiError, NewAgent, SharedApi};

pub const NAME_REQUIRED: &str = "El nombre es obligatorio";
pub const PROMPT_REQUIRED: &str = "El prompt es obligatorio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { agent_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Prompt,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Prompt,
            FormField::Prompt => FormField::Name,
        }
    }
}

/// The two values a form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDraft {
    pub name: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub prompt: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.prompt.is_none()
    }
}

impl AgentDraft {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }

    /// Both fields must be non-empty after trimming.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors = FieldErrors {
            name: self.name.trim().is_empty().then_some(NAME_REQUIRED),
            prompt: self.prompt.trim().is_empty().then_some(PROMPT_REQUIRED),
        };
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.prompt.trim())
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// Validation failed; nothing was sent.
    Invalid,
    /// A previous submission is still outstanding.
    Busy,
    Sent,
}

/// Signal raised to the owning view once the backend accepted the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSignal {
    /// `agent_id` is absent when the backend accepted the agent without
    /// echoing its identifier.
    Created { agent_id: Option<String> },
    Updated { agent_id: String },
}

struct FormSettled {
    draft: AgentDraft,
    result: Result<Option<String>, ApiError>,
}

/// Modal form state, independent of the data of the view that opened it.
pub struct AgentForm {
    api: SharedApi,
    mode: FormMode,
    name: Composer,
    prompt: Composer,
    defaults: AgentDraft,
    errors: FieldErrors,
    focus: FormField,
    open: bool,
    submitting: bool,
    requests: Requests<FormSettled>,
}

impl AgentForm {
    pub fn create(api: SharedApi) -> Self {
        Self::with_defaults(api, FormMode::Create, AgentDraft::default())
    }

    pub fn edit(api: SharedApi, agent_id: impl Into<String>, current: AgentDraft) -> Self {
        Self::with_defaults(
            api,
            FormMode::Edit {
                agent_id: agent_id.into(),
            },
            current,
        )
    }

    fn with_defaults(api: SharedApi, mode: FormMode, defaults: AgentDraft) -> Self {
        Self {
            api,
            mode,
            name: Composer::with_text(defaults.name.clone()),
            prompt: Composer::with_text(defaults.prompt.clone()),
            defaults,
            errors: FieldErrors::default(),
            focus: FormField::Name,
            open: false,
            submitting: false,
            requests: Requests::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn defaults(&self) -> &AgentDraft {
        &self.defaults
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Crear Nuevo Agente",
            FormMode::Edit { .. } => "Editar Agente",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (&self.mode, self.submitting) {
            (FormMode::Create, true) => "Creando...",
            (FormMode::Create, false) => "Crear Agente",
            (FormMode::Edit { .. }, true) => "Guardando...",
            (FormMode::Edit { .. }, false) => "Guardar Cambios",
        }
    }

    /// Opens the form with its current defaults in the fields.
    pub fn open(&mut self) {
        if !self.open {
            self.name.set(self.defaults.name.clone());
            self.prompt.set(self.defaults.prompt.clone());
            self.errors = FieldErrors::default();
            self.focus = FormField::Name;
        }
        self.open = true;
    }

    /// Closes without saving. Refused while a submission is outstanding.
    pub fn cancel(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.open = false;
        true
    }

    /// Replaces the defaults used next time the form opens.
    pub fn set_defaults(&mut self, defaults: AgentDraft) {
        self.defaults = defaults;
    }

    pub fn field(&self, field: FormField) -> &Composer {
        match field {
            FormField::Name => &self.name,
            FormField::Prompt => &self.prompt,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut Composer {
        match field {
            FormField::Name => &mut self.name,
            FormField::Prompt => &mut self.prompt,
        }
    }

    pub fn focused_mut(&mut self) -> &mut Composer {
        self.field_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn set_focus(&mut self, field: FormField) {
        self.focus = field;
    }

    pub fn draft(&self) -> AgentDraft {
        AgentDraft::new(self.name.buffer(), self.prompt.buffer())
    }

    /// Validates and, when valid, sends the create/update request.
    pub fn submit(&mut self) -> Submit {
        if self.submitting {
            return Submit::Busy;
        }
        let draft = self.draft();
        if let Err(errors) = draft.validate() {
            warn!("form rejected locally: {:?}", errors);
            self.focus = if errors.name.is_some() {
                FormField::Name
            } else {
                FormField::Prompt
            };
            self.errors = errors;
            return Submit::Invalid;
        }
        self.errors = FieldErrors::default();
        self.submitting = true;

        let draft = draft.trimmed();
        let api = self.api.clone();
        let mode = self.mode.clone();
        self.requests.spawn(async move {
            let result = match &mode {
                FormMode::Create => {
                    api.create_agent(&NewAgent {
                        name: draft.name.clone(),
                        prompt: draft.prompt.clone(),
                    })
                    .await
                }
                FormMode::Edit { agent_id } => {
                    let changes = AgentUpdate {
                        name: Some(draft.name.clone()),
                        prompt: Some(draft.prompt.clone()),
                    };
                    api.update_agent(agent_id, &changes).await.map(|()| None)
                }
            };
            FormSettled { draft, result }
        });
        Submit::Sent
    }

    pub fn poll(&mut self, notices: &mut Notices) -> Option<FormSignal> {
        let mut signal = None;
        for settled in self.requests.ready() {
            signal = self.apply(settled, notices).or(signal);
        }
        signal
    }

    pub async fn settle(&mut self, notices: &mut Notices) -> Option<FormSignal> {
        let settled = self.requests.next().await?;
        self.apply(settled, notices)
    }

    fn apply(&mut self, settled: FormSettled, notices: &mut Notices) -> Option<FormSignal> {
        self.submitting = false;
        match (settled.result, &self.mode) {
            (Ok(agent_id), FormMode::Create) => {
                info!("created agent {}", agent_id.as_deref().unwrap_or("(id not echoed)"));
                notices.success("Agente creado con éxito.");
                self.defaults = AgentDraft::default();
                self.name.clear();
                self.prompt.clear();
                self.open = false;
                Some(FormSignal::Created { agent_id })
            }
            (Ok(_), FormMode::Edit { agent_id }) => {
                info!("updated agent {}", agent_id);
                notices.success("Agente actualizado con éxito.");
                let agent_id = agent_id.clone();
                self.defaults = settled.draft;
                self.open = false;
                Some(FormSignal::Updated { agent_id })
            }
            (Err(err), FormMode::Create) => {
                error!("error creating agent: {}", err);
                notices.error("Hubo un error al crear el agente.");
                None
            }
            (Err(err), FormMode::Edit { agent_id }) => {
                error!("error updating agent {}: {}", agent_id, err);
                notices.error("Hubo un error al actualizar el agente.");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockApi, Op};

    fn type_into(form: &mut AgentForm, field: FormField, text: &str) {
        form.set_focus(field);
        for ch in text.chars() {
            form.focused_mut().insert_char(ch);
        }
    }

    #[test]
    fn validation_requires_both_fields_after_trimming() {
        assert!(AgentDraft::new("Bot", "Eres útil").validate().is_ok());
        let errors = AgentDraft::new("  ", "\n").validate().unwrap_err();
        assert_eq!(errors.name, Some(NAME_REQUIRED));
        assert_eq!(errors.prompt, Some(PROMPT_REQUIRED));
        let errors = AgentDraft::new("Bot", " ").validate().unwrap_err();
        assert_eq!(errors.name, None);
    }

    #[tokio::test]
    async fn invalid_submit_never_touches_the_network() {
        let api = MockApi::new().shared();
        let mut form = AgentForm::create(api.clone());
        form.open();
        type_into(&mut form, FormField::Name, "Bot");

        assert_eq!(form.submit(), Submit::Invalid);
        assert_eq!(form.errors().prompt, Some(PROMPT_REQUIRED));
        assert_eq!(form.focus(), FormField::Prompt);
        assert!(!form.is_submitting());
        tokio::task::yield_now().await;
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn create_success_resets_closes_and_signals() {
        let api = MockApi::new().shared();
        let mut notices = Notices::default();
        let mut form = AgentForm::create(api.clone());
        form.open();
        type_into(&mut form, FormField::Name, " Bot ");
        type_into(&mut form, FormField::Prompt, "Eres útil");

        assert_eq!(form.submit(), Submit::Sent);
        assert!(form.is_submitting());
        assert_eq!(form.submit_label(), "Creando...");
        assert_eq!(form.submit(), Submit::Busy);

        let signal = form.settle(&mut notices).await;
        assert!(matches!(signal, Some(FormSignal::Created { .. })));
        assert!(!form.is_open());
        assert!(!form.is_submitting());
        assert!(form.field(FormField::Name).is_empty());
        assert_eq!(api.calls(Op::Create), 1);
        assert_eq!(api.last_argument(Op::Create).as_deref(), Some("Bot|Eres útil"));
        assert!(notices.contains("Agente creado con éxito."));
    }

    #[tokio::test]
    async fn create_accepted_without_echoed_id_still_closes() {
        use std::collections::BTreeMap;
        use std::sync::Arc;

        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use crate::api::HttpApiClient;
        use crate::config::ApiSettings;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"name": "Bot", "prompt": "p"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = HttpApiClient::new(&ApiSettings {
            base_url: server.uri(),
            timeout_secs: None,
            headers: BTreeMap::new(),
        })
        .unwrap();

        let mut notices = Notices::default();
        let mut form = AgentForm::create(Arc::new(client));
        form.open();
        form.field_mut(FormField::Name).set("Bot");
        form.field_mut(FormField::Prompt).set("p");
        form.submit();

        let signal = form.settle(&mut notices).await;
        assert_eq!(signal, Some(FormSignal::Created { agent_id: None }));
        assert!(!form.is_open());
        assert!(notices.contains("Agente creado con éxito."));
        assert!(!notices.contains("Hubo un error al crear el agente."));
    }

    #[tokio::test]
    async fn failure_keeps_the_form_open_with_fields_intact() {
        let api = MockApi::new().shared();
        api.fail(Op::Create);
        let mut notices = Notices::default();
        let mut form = AgentForm::create(api.clone());
        form.open();
        type_into(&mut form, FormField::Name, "Bot");
        type_into(&mut form, FormField::Prompt, "Eres útil");

        form.submit();
        assert_eq!(form.settle(&mut notices).await, None);
        assert!(form.is_open());
        assert!(!form.is_submitting());
        assert_eq!(form.draft(), AgentDraft::new("Bot", "Eres útil"));
        assert!(notices.contains("Hubo un error al crear el agente."));
    }

    #[tokio::test]
    async fn edit_keeps_saved_values_as_new_defaults() {
        let api = MockApi::new().with_agent("a1", "Bot", "viejo", &[]).shared();
        let mut notices = Notices::default();
        let mut form = AgentForm::edit(api.clone(), "a1", AgentDraft::new("Bot", "viejo"));
        form.open();
        assert_eq!(form.draft(), AgentDraft::new("Bot", "viejo"));

        form.field_mut(FormField::Prompt).set("nuevo");
        assert_eq!(form.submit(), Submit::Sent);
        let signal = form.settle(&mut notices).await;
        assert_eq!(
            signal,
            Some(FormSignal::Updated {
                agent_id: "a1".into()
            })
        );
        assert_eq!(api.last_argument(Op::Update).as_deref(), Some("a1|Bot|nuevo"));

        form.open();
        assert_eq!(form.draft(), AgentDraft::new("Bot", "nuevo"));
    }

    #[tokio::test]
    async fn cancel_is_refused_while_submitting() {
        let api = MockApi::new().shared();
        let mut notices = Notices::default();
        let mut form = AgentForm::create(api);
        form.open();
        form.field_mut(FormField::Name).set("Bot");
        form.field_mut(FormField::Prompt).set("p");
        form.submit();
        assert!(!form.cancel());
        form.settle(&mut notices).await;
        form.open();
        assert!(form.cancel());
        assert!(!form.is_open());
    }
}
