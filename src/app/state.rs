//! Core state structures for the application.
//!
//! `App` holds every screen's state plus the shared notice queue and the
//! active overlay. Server-synchronised data lives in the views; `App` only
//! decides which one is on screen and routes input to it.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::SharedApi;
use crate::views::{AgentDetailView, AgentForm, AgentListView, Composer, ConfirmDialog, Notices};

pub struct App {
    pub should_quit: bool,
    pub(crate) api: SharedApi,
    /// Relative upload paths are resolved against this directory.
    pub workspace_root: PathBuf,

    pub list: AgentListView,
    pub create_form: AgentForm,
    pub screen: Screen,
    pub focus: DetailFocus,
    pub overlay: Option<OverlayState>,
    pub notices: Notices,

    pub(crate) tick_rate: Duration,
}

/// The screen currently shown.
pub enum Screen {
    List,
    Detail(Box<AgentDetailView>),
}

impl Screen {
    pub fn detail(&self) -> Option<&AgentDetailView> {
        match self {
            Screen::Detail(view) => Some(view),
            Screen::List => None,
        }
    }

    pub fn detail_mut(&mut self) -> Option<&mut AgentDetailView> {
        match self {
            Screen::Detail(view) => Some(view),
            Screen::List => None,
        }
    }
}

/// Which pane of the detail screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFocus {
    Chat,
    Documents,
}

/// Destructive actions gated by a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteAgent,
    DeleteDocument(String),
}

pub enum OverlayState {
    Confirm(ConfirmState),
    UploadPrompt(InputPromptState),
}

/// A confirmation dialog plus whether its action was already dispatched.
///
/// After dispatch the dialog stays up, disabled, until the view reports the
/// request settled.
pub struct ConfirmState {
    pub dialog: ConfirmDialog<ConfirmAction>,
    pub dispatched: bool,
}

impl ConfirmState {
    pub fn new(dialog: ConfirmDialog<ConfirmAction>) -> Self {
        Self {
            dialog,
            dispatched: false,
        }
    }
}

/// State for the single-line path prompt used by uploads.
#[derive(Debug, Clone)]
pub struct InputPromptState {
    pub title: String,
    pub value: Composer,
    pub placeholder: String,
    pub error: Option<String>,
}

impl InputPromptState {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: Composer::new(),
            placeholder: placeholder.into(),
            error: None,
        }
    }
}
