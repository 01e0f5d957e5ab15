use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, DetailFocus, OverlayState, Screen};
use crate::views::{Composer, NoticeLevel};

mod detail;
mod list;
mod overlay;
mod theme;
use theme::*;

pub fn render(f: &mut Frame<'_>, app: &App) {
    let size = f.size();
    if size.width < 60 || size.height < 16 {
        let block = Paragraph::new("La ventana del terminal es demasiado pequeña (mínimo 60x16).")
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title("Agentes")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(FG_PRIMARY).bg(DIALOG_BG)),
            )
            .style(Style::default().fg(FG_PRIMARY).bg(BG_PRIMARY));
        f.render_widget(block, size);
        return;
    }

    let base = Block::default().style(Style::default().bg(BG_PRIMARY));
    f.render_widget(base, size);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(size);
    let workspace = vertical[0];
    let status_area = vertical[1];

    match &app.screen {
        Screen::List => list::render_agent_list(f, &app.list, workspace),
        Screen::Detail(view) => detail::render_agent_detail(f, view, app.focus, workspace),
    }
    render_status_bar(f, app, status_area);

    match &app.screen {
        Screen::List if app.create_form.is_open() => overlay::render_form(f, &app.create_form),
        Screen::Detail(view) => {
            if let Some(form) = view.edit_form() {
                overlay::render_form(f, form);
            }
        }
        Screen::List => {}
    }

    if let Some(state) = app.overlay.as_ref() {
        match state {
            OverlayState::Confirm(confirm) => {
                let busy = app.action_busy(confirm.dialog.action());
                overlay::render_confirm(f, confirm, busy);
            }
            OverlayState::UploadPrompt(prompt) => {
                let workspace = app.workspace_root.display().to_string();
                overlay::render_upload_prompt(f, prompt, &workspace);
            }
        }
    }
}

fn render_status_bar(f: &mut Frame<'_>, app: &App, area: Rect) {
    f.render_widget(Clear, area);
    let (text, bg) = match app.notices.latest() {
        Some(notice) => {
            let bg = match notice.level {
                NoticeLevel::Info => BAR_BG,
                NoticeLevel::Success => NOTICE_SUCCESS,
                NoticeLevel::Error => NOTICE_ERROR,
            };
            let text = match &notice.detail {
                Some(detail) => format!(" {} {}", notice.message, detail),
                None => format!(" {}", notice.message),
            };
            (text, bg)
        }
        None => (format!(" {}", key_hints(app)), BAR_BG),
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(BAR_TEXT).bg(bg),
    )))
    .style(Style::default().fg(BAR_TEXT).bg(bg))
    .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match (&app.screen, app.focus) {
        (Screen::List, _) => "↑/↓ elegir · Enter abrir · n nuevo agente · r recargar · Ctrl+Q salir",
        (Screen::Detail(_), DetailFocus::Chat) => {
            "Enter enviar · Tab documentos · Ctrl+U subir · Ctrl+E editar · Ctrl+D eliminar · Esc volver"
        }
        (Screen::Detail(_), DetailFocus::Documents) => {
            "↑/↓ elegir · Supr eliminar documento · Tab chat · Esc volver al chat"
        }
    }
}

pub(crate) fn push_wrapped_line(lines: &mut Vec<Line>, text: &str, style: Style, width: usize) {
    for segment in wrap_to_width(text, width) {
        lines.push(Line::from(Span::styled(segment, style)));
    }
}

fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1).max(1);
        if current_width + ch_width > width && !current.is_empty() {
            result.push(current);
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    result.push(current);
    result
}

/// Places the terminal cursor inside `inner` at the composer's cursor.
fn set_composer_cursor(f: &mut Frame<'_>, composer: &Composer, inner: Rect) {
    let width = inner.width.max(1) as usize;
    let (col, row) = composer.cursor_display_position(width);
    let x = inner
        .x
        .saturating_add(col.min(width.saturating_sub(1) as u16));
    let y = inner
        .y
        .saturating_add(row.min(inner.height.saturating_sub(1)));
    f.set_cursor(x, y);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1])[1]
}
