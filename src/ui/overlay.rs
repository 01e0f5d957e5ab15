use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::*;
use super::{centered_rect, set_composer_cursor};
use crate::app::{ConfirmAction, ConfirmState, InputPromptState};
use crate::views::{AgentForm, ConfirmDialog, FormField};

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(BAR_TEXT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIALOG_BORDER))
        .style(Style::default().bg(DIALOG_BG))
}

fn button_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(HIGHLIGHT_BG)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BAR_TEXT)
    }
}

pub(super) fn render_form(f: &mut Frame<'_>, form: &AgentForm) {
    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);
    let block = dialog_block(form.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_field(f, form, FormField::Name, "Nombre del agente", chunks[0]);
    render_field_error(f, form.errors().name, chunks[1]);
    render_field(f, form, FormField::Prompt, "Prompt (instrucciones)", chunks[2]);
    render_field_error(f, form.errors().prompt, chunks[3]);

    let submit = Paragraph::new(Line::from(Span::styled(
        format!(" [{}] ", form.submit_label()),
        button_style(!form.is_submitting()),
    )))
    .style(Style::default().bg(DIALOG_BG))
    .alignment(Alignment::Center);
    f.render_widget(submit, chunks[4]);

    let hint = Paragraph::new("Tab cambia de campo · Ctrl+S guardar · Esc cancelar")
        .style(Style::default().fg(FG_DIM).bg(DIALOG_BG))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[5]);
}

fn render_field(f: &mut Frame<'_>, form: &AgentForm, field: FormField, label: &str, area: Rect) {
    let focused = form.focus() == field;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(BORDER_FOCUS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(BORDER_IDLE)
        })
        .title(Span::styled(label, Style::default().fg(FG_PRIMARY)))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    let composer = form.field(field);
    let text: Vec<Line> = composer
        .buffer()
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::White))))
        .collect();
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
    if focused {
        set_composer_cursor(f, composer, inner);
    }
}

fn render_field_error(f: &mut Frame<'_>, error: Option<&str>, area: Rect) {
    if let Some(message) = error {
        let widget = Paragraph::new(message).style(Style::default().fg(ERROR_TEXT).bg(DIALOG_BG));
        f.render_widget(widget, area);
    }
}

pub(super) fn render_confirm(f: &mut Frame<'_>, state: &ConfirmState, busy: bool) {
    let area = centered_rect(60, 35, f.size());
    f.render_widget(Clear, area);
    let dialog = &state.dialog;
    let block = dialog_block(dialog.title.as_str());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let description = Paragraph::new(dialog.description.as_str())
        .style(Style::default().fg(Color::White).bg(DIALOG_BG))
        .wrap(Wrap { trim: true });
    f.render_widget(description, chunks[0]);

    let disabled = busy || state.dispatched;
    let confirm_label = ConfirmDialog::<ConfirmAction>::confirm_label(disabled);
    let buttons = Paragraph::new(Line::from(vec![
        Span::styled(
            " [Cancelar] ",
            button_style(!dialog.confirm_selected() && !disabled),
        ),
        Span::styled("  ", Style::default().bg(DIALOG_BG)),
        Span::styled(
            format!(" [{}] ", confirm_label),
            button_style(dialog.confirm_selected()),
        ),
    ]))
    .style(Style::default().bg(DIALOG_BG))
    .alignment(Alignment::Center);
    f.render_widget(buttons, chunks[1]);

    let hint = Paragraph::new("←/→ elegir · Enter aceptar · Esc cancelar")
        .style(Style::default().fg(FG_DIM).bg(DIALOG_BG))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

pub(super) fn render_upload_prompt(f: &mut Frame<'_>, state: &InputPromptState, workspace: &str) {
    let area = centered_rect(60, 30, f.size());
    f.render_widget(Clear, area);
    let block = dialog_block(state.title.as_str());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let placeholder =
        Paragraph::new(state.placeholder.as_str()).style(Style::default().fg(FG_DIM).bg(DIALOG_BG));
    f.render_widget(placeholder, chunks[0]);

    let mut input_spans = vec![Span::styled("> ", Style::default().fg(FG_PRIMARY))];
    if state.value.is_empty() {
        input_spans.push(Span::styled("(vacío)", Style::default().fg(FG_DIM)));
    } else {
        input_spans.push(Span::styled(
            state.value.buffer(),
            Style::default().fg(Color::White),
        ));
    }
    input_spans.push(Span::styled(" ▍", Style::default().fg(BORDER_FOCUS)));
    let input = Paragraph::new(Line::from(input_spans)).style(Style::default().bg(DIALOG_BG));
    f.render_widget(input, chunks[1]);

    let workspace_hint = Paragraph::new(format!("Directorio de trabajo: {}", workspace))
        .style(Style::default().fg(FG_DIM).bg(DIALOG_BG));
    f.render_widget(workspace_hint, chunks[2]);

    if let Some(error) = state.error.as_ref() {
        let error_widget =
            Paragraph::new(error.as_str()).style(Style::default().fg(ERROR_TEXT).bg(DIALOG_BG));
        f.render_widget(error_widget, chunks[3]);
    } else {
        let hint = Paragraph::new("Enter subir · Esc cancelar")
            .style(Style::default().fg(FG_DIM).bg(DIALOG_BG));
        f.render_widget(hint, chunks[3]);
    }
}
