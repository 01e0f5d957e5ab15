use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use super::{App, DetailFocus, Screen};
use crate::views::{AgentForm, Composer, FormField, SendOutcome};

impl App {
    /// Entry point for keyboard input: overlays first, then open forms, then
    /// the current screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if is_ctrl(key, 'q') {
            self.should_quit = true;
            return;
        }

        if self.overlay.is_some() {
            self.handle_overlay_key(key);
            return;
        }

        let form_open = match &self.screen {
            Screen::List => self.create_form.is_open(),
            Screen::Detail(view) => view.edit_form().is_some(),
        };
        if form_open {
            if let Some(form) = self.open_form_mut() {
                handle_form_key(form, key);
            }
            return;
        }

        match self.screen {
            Screen::List => self.handle_list_key(key),
            Screen::Detail(_) => self.handle_detail_key(key),
        }
    }

    fn open_form_mut(&mut self) -> Option<&mut AgentForm> {
        match &mut self.screen {
            Screen::List => Some(&mut self.create_form).filter(|form| form.is_open()),
            Screen::Detail(view) => view.edit_form_mut(),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::Enter => self.open_selected_agent(),
            KeyCode::Char('n') => self.open_create_form(),
            KeyCode::Char('r') => self.list.refresh(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if is_ctrl(key, 'u') {
            self.prompt_upload();
            return;
        }
        if is_ctrl(key, 'e') {
            if let Some(view) = self.screen.detail_mut() {
                view.open_edit();
            }
            return;
        }
        if is_ctrl(key, 'd') {
            self.confirm_delete_agent();
            return;
        }
        match key.code {
            KeyCode::Esc => {
                if self.focus == DetailFocus::Documents {
                    self.focus = DetailFocus::Chat;
                } else {
                    self.back_to_list();
                }
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_detail_focus();
                return;
            }
            KeyCode::Delete | KeyCode::Backspace if self.focus == DetailFocus::Documents => {
                self.confirm_delete_document();
                return;
            }
            _ => {}
        }

        let Some(view) = self.screen.detail_mut() else {
            return;
        };
        match key.code {
            KeyCode::PageUp => {
                view.transcript_mut().scroll_up(5);
                return;
            }
            KeyCode::PageDown => {
                view.transcript_mut().scroll_down(5);
                return;
            }
            _ => {}
        }

        match self.focus {
            DetailFocus::Documents => match key.code {
                KeyCode::Up => view.move_document_selection(-1),
                KeyCode::Down => view.move_document_selection(1),
                _ => {}
            },
            DetailFocus::Chat => match key.code {
                KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                    view.input_mut().insert_newline();
                }
                KeyCode::Enter => {
                    let outcome = view.send_message();
                    if outcome != SendOutcome::NotLoaded {
                        debug!("chat send: {:?}", outcome);
                    }
                }
                KeyCode::Up => {
                    view.input_mut().history_previous();
                }
                KeyCode::Down => {
                    view.input_mut().history_next();
                }
                _ => edit_text(view.input_mut(), key),
            },
        }
    }
}

fn handle_form_key(form: &mut AgentForm, key: KeyEvent) {
    if is_ctrl(key, 's') {
        let outcome = form.submit();
        debug!("form submit: {:?}", outcome);
        return;
    }
    match key.code {
        KeyCode::Esc => {
            form.cancel();
        }
        KeyCode::Tab | KeyCode::BackTab => form.focus_next(),
        KeyCode::Enter if form.focus() == FormField::Name => form.focus_next(),
        KeyCode::Enter => form.focused_mut().insert_newline(),
        _ => edit_text(form.focused_mut(), key),
    }
}

/// Plain text editing shared by the chat input and form fields.
fn edit_text(composer: &mut Composer, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => composer.backspace(),
        KeyCode::Delete => composer.delete(),
        KeyCode::Left => composer.move_left(),
        KeyCode::Right => composer.move_right(),
        KeyCode::Home => composer.move_to_line_start(),
        KeyCode::End => composer.move_to_line_end(),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            composer.insert_char(ch)
        }
        _ => {}
    }
}

fn is_ctrl(key: KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
}
