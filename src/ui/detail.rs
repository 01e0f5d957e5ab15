use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::theme::*;
use super::{push_wrapped_line, set_composer_cursor};
use crate::app::DetailFocus;
use crate::views::{AgentDetailView, AgentLoad, ChatMessage, Sender};

const DOCUMENTS_WIDTH: u16 = 34;
/// Most prompt lines shown in the header before it is cut with an ellipsis.
const PROMPT_LINES: usize = 3;

pub(super) fn render_agent_detail(
    f: &mut Frame<'_>,
    view: &AgentDetailView,
    focus: DetailFocus,
    area: Rect,
) {
    let Some(agent) = view.agent() else {
        let text = match view.load_state() {
            AgentLoad::Loading => "Cargando agente...",
            _ => "Agente no encontrado o error al cargar.",
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(BORDER_IDLE))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .style(Style::default().fg(FG_DIM));
        f.render_widget(paragraph, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(DOCUMENTS_WIDTH)])
        .split(area);
    let prompt_width = columns[0].width.saturating_sub(2).max(1) as usize;
    let prompt_lines = agent_prompt_lines(&agent.prompt, prompt_width);
    let chat_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(prompt_lines.len() as u16 + 2),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(columns[0]);

    render_agent_header(f, &agent.name, prompt_lines, chat_column[0]);
    render_transcript(f, view, &agent.name, focus, chat_column[1]);
    render_chat_input(f, view, focus, chat_column[2]);
    render_documents(f, view, focus, columns[1]);
}

/// The agent's prompt wrapped to `width`, capped at [`PROMPT_LINES`].
fn agent_prompt_lines(prompt: &str, width: usize) -> Vec<Line<'static>> {
    let style = Style::default().fg(FG_DIM);
    let mut lines = Vec::new();
    for line in prompt.trim().lines() {
        push_wrapped_line(&mut lines, line, style, width);
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("(sin prompt)", style)));
    }
    if lines.len() > PROMPT_LINES {
        lines.truncate(PROMPT_LINES);
        lines.push(Line::from(Span::styled("...", style)));
    }
    lines
}

fn render_agent_header(f: &mut Frame<'_>, name: &str, prompt: Vec<Line<'static>>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_IDLE))
        .title(Span::styled(
            name.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(BG_PANEL));
    f.render_widget(Paragraph::new(prompt).block(block), area);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BORDER_FOCUS)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BORDER_IDLE)
    }
}

fn render_transcript(
    f: &mut Frame<'_>,
    view: &AgentDetailView,
    agent_name: &str,
    focus: DetailFocus,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focus == DetailFocus::Chat))
        .title(Span::styled(
            format!("Chat con {}", agent_name),
            Style::default().fg(FG_PRIMARY),
        ))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    let wrap_width = inner.width.max(1) as usize;

    let transcript = view.transcript();
    if transcript.is_empty() && !view.is_sending() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "La conversación está vacía.",
            Style::default().fg(FG_DIM),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for message in transcript.messages() {
        push_message(&mut lines, message, agent_name, wrap_width);
        lines.push(Line::default());
    }
    if view.is_sending() {
        lines.push(Line::from(Span::styled(
            format!("{} está escribiendo...", agent_name),
            Style::default().fg(FG_DIM).add_modifier(Modifier::ITALIC),
        )));
    }

    // Follow the newest message unless the user scrolled back.
    let height = inner.height as usize;
    let bottom = lines.len().saturating_sub(height);
    transcript.set_scroll_limit(bottom);
    let offset = bottom.saturating_sub(transcript.scroll_back());
    let offset = offset.min(u16::MAX as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(BG_PANEL))
        .scroll((offset, 0));
    f.render_widget(paragraph, area);
}

fn push_message(lines: &mut Vec<Line>, message: &ChatMessage, agent_name: &str, width: usize) {
    let (label, color) = match message.sender {
        Sender::User => ("Tú", USER_LABEL),
        Sender::Agent => (agent_name, AGENT_LABEL),
    };
    lines.push(Line::from(Span::styled(
        label.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    let text_style = Style::default().fg(Color::White);
    if message.text.is_empty() {
        push_wrapped_line(lines, "", text_style, width);
    }
    for line in message.text.lines() {
        push_wrapped_line(lines, line, text_style, width);
    }
    if !message.sources.is_empty() {
        push_wrapped_line(
            lines,
            &format!("Fuentes: {}", message.sources.join(", ")),
            Style::default().fg(FG_DIM).add_modifier(Modifier::ITALIC),
            width,
        );
    }
}

fn render_chat_input(f: &mut Frame<'_>, view: &AgentDetailView, focus: DetailFocus, area: Rect) {
    let focused = focus == DetailFocus::Chat;
    let title = if view.is_sending() {
        "Esperando respuesta..."
    } else {
        "Pregunta algo (Enter envía · Alt+Enter nueva línea)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(Span::styled(title, Style::default().fg(FG_PRIMARY)))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);

    let input = view.input();
    let lines: Vec<Line> = if input.is_empty() {
        vec![Line::from(Span::styled(
            "Escribe tu pregunta...",
            Style::default().fg(FG_DIM),
        ))]
    } else {
        input
            .buffer()
            .split('\n')
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(FG_PRIMARY))))
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(BG_PANEL))
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);

    if focused {
        set_composer_cursor(f, input, inner);
    }
}

fn render_documents(f: &mut Frame<'_>, view: &AgentDetailView, focus: DetailFocus, area: Rect) {
    let Some(agent) = view.agent() else {
        return;
    };
    let focused = focus == DetailFocus::Documents;
    let mut title = format!("Documentos ({})", agent.document_count());
    if view.is_uploading() {
        title.push_str(" · subiendo...");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(Span::styled(title, Style::default().fg(FG_PRIMARY)))
        .style(Style::default().bg(BG_PANEL));

    if agent.documents.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "Sin documentos.",
                Style::default().fg(FG_DIM),
            )),
            Line::from(Span::styled(
                "Ctrl+U para subir uno.",
                Style::default().fg(FG_DIM),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = agent
        .documents
        .iter()
        .map(|doc| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    doc.file_name.clone(),
                    Style::default().fg(Color::White),
                )),
                Line::from(Span::styled(
                    doc.uploaded_at.clone(),
                    Style::default().fg(FG_DIM),
                )),
            ])
        })
        .collect();

    let mut state = ListState::default();
    if focused {
        state.select(Some(view.selected_document_index()));
    }
    let list = List::new(items)
        .block(block)
        .style(Style::default().bg(BG_PANEL))
        .highlight_style(
            Style::default()
                .bg(SELECTION_BG)
                .fg(SELECTION_FG)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut state);
}
