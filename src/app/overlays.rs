use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};

use super::{App, ConfirmAction, ConfirmState, InputPromptState, OverlayState};
use crate::api::ACCEPTED_EXTENSIONS;
use crate::views::ConfirmDialog;

pub const UPLOAD_TITLE: &str = "Subir documento";
pub const DELETE_AGENT_TITLE: &str = "¿Estás seguro de que quieres eliminar este agente?";
pub const DELETE_DOCUMENT_TITLE: &str = "¿Eliminar documento?";

impl App {
    pub(crate) fn prompt_upload(&mut self) {
        if self.screen.detail().and_then(|view| view.agent()).is_none() {
            return;
        }
        let hint = ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        debug!("showing upload prompt");
        self.overlay = Some(OverlayState::UploadPrompt(InputPromptState::new(
            UPLOAD_TITLE,
            format!("Ruta del archivo ({hint})"),
        )));
    }

    pub(crate) fn confirm_delete_agent(&mut self) {
        let Some(agent) = self.screen.detail().and_then(|view| view.agent()) else {
            return;
        };
        let description = format!(
            "Esta acción no se puede deshacer. Se eliminará permanentemente el agente \"{}\" y todos sus documentos asociados.",
            agent.name
        );
        self.overlay = Some(OverlayState::Confirm(ConfirmState::new(ConfirmDialog::new(
            DELETE_AGENT_TITLE,
            description,
            ConfirmAction::DeleteAgent,
        ))));
    }

    pub(crate) fn confirm_delete_document(&mut self) {
        let Some(file_name) = self
            .screen
            .detail()
            .and_then(|view| view.selected_document())
            .map(str::to_string)
        else {
            return;
        };
        let description = format!(
            "Se eliminará \"{}\" de la base de conocimiento del agente.",
            file_name
        );
        self.overlay = Some(OverlayState::Confirm(ConfirmState::new(ConfirmDialog::new(
            DELETE_DOCUMENT_TITLE,
            description,
            ConfirmAction::DeleteDocument(file_name),
        ))));
    }

    pub(crate) fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Whether the request behind `action` is still outstanding.
    pub(crate) fn action_busy(&self, action: &ConfirmAction) -> bool {
        let Some(view) = self.screen.detail() else {
            return false;
        };
        match action {
            ConfirmAction::DeleteAgent => view.is_deleting_agent(),
            ConfirmAction::DeleteDocument(_) => view.is_deleting_document(),
        }
    }

    /// Routes a key to the active overlay, which is taken out of `self` for
    /// the duration and put back unless it closed.
    pub(crate) fn handle_overlay_key(&mut self, key: KeyEvent) {
        if let Some(overlay) = self.overlay.take() {
            match overlay {
                OverlayState::Confirm(state) => self.handle_confirm_key(key, state),
                OverlayState::UploadPrompt(state) => self.handle_upload_prompt_key(key, state),
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, mut state: ConfirmState) {
        let busy = self.action_busy(state.dialog.action());
        if state.dispatched || busy {
            // Disabled until the request settles; tick closes it.
            self.overlay = Some(OverlayState::Confirm(state));
            return;
        }
        match key.code {
            KeyCode::Esc => {
                debug!("confirmation cancelled");
                return;
            }
            KeyCode::Left => state.dialog.select_confirm(true),
            KeyCode::Right => state.dialog.select_confirm(false),
            KeyCode::Tab | KeyCode::BackTab => state.dialog.toggle_selection(),
            KeyCode::Enter => {
                if !state.dialog.confirm_selected() {
                    return;
                }
                if let Some(action) = state.dialog.confirm(busy) {
                    state.dispatched = self.dispatch_confirmed(action);
                    if !state.dispatched {
                        return;
                    }
                }
            }
            _ => {}
        }
        self.overlay = Some(OverlayState::Confirm(state));
    }

    fn dispatch_confirmed(&mut self, action: ConfirmAction) -> bool {
        let Some(view) = self.screen.detail_mut() else {
            return false;
        };
        info!("confirmed {:?} on {}", action, view.agent_id());
        match action {
            ConfirmAction::DeleteAgent => view.delete_agent(),
            ConfirmAction::DeleteDocument(file_name) => view.delete_document(file_name),
        }
    }

    fn handle_upload_prompt_key(&mut self, key: KeyEvent, mut state: InputPromptState) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                if self.submit_upload(&mut state) {
                    return;
                }
            }
            KeyCode::Backspace => {
                state.value.backspace();
                state.error = None;
            }
            KeyCode::Delete => state.value.delete(),
            KeyCode::Left => state.value.move_left(),
            KeyCode::Right => state.value.move_right(),
            KeyCode::Home => state.value.move_to_line_start(),
            KeyCode::End => state.value.move_to_line_end(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                state.value.insert_char(ch);
                state.error = None;
            }
            _ => {}
        }
        self.overlay = Some(OverlayState::UploadPrompt(state));
    }

    /// Starts the upload; returns true when the prompt can close.
    fn submit_upload(&mut self, state: &mut InputPromptState) -> bool {
        let raw = state.value.buffer().trim();
        if raw.is_empty() {
            state.error = Some(String::from("Indica la ruta de un archivo."));
            return false;
        }
        let mut path = PathBuf::from(raw);
        if path.is_relative() {
            path = self.workspace_root.join(path);
        }
        let Some(view) = self.screen.detail_mut() else {
            return true;
        };
        if view.upload_document(path, &mut self.notices) {
            true
        } else {
            state.error = Some(String::from("Ya hay una subida en curso."));
            false
        }
    }
}
