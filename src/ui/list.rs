use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::theme::*;
use crate::views::{AgentListView, ListState as AgentsState, document_count_label};

pub(super) fn render_agent_list(f: &mut Frame<'_>, view: &AgentListView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_FOCUS).add_modifier(Modifier::BOLD))
        .title(Span::styled("Agentes", Style::default().fg(FG_PRIMARY)))
        .style(Style::default().bg(BG_PANEL));

    let placeholder = match view.state() {
        AgentsState::Loading => Some(vec![Line::from(Span::styled(
            "Cargando agentes...",
            Style::default().fg(FG_DIM),
        ))]),
        AgentsState::Failed(detail) => Some(vec![
            Line::from(Span::styled(
                "No se pudieron cargar los agentes.",
                Style::default().fg(ERROR_TEXT).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(detail.clone(), Style::default().fg(FG_DIM))),
            Line::from(Span::styled(
                "Pulsa r para reintentar.",
                Style::default().fg(FG_DIM),
            )),
        ]),
        AgentsState::Loaded(agents) if agents.is_empty() => Some(vec![Line::from(Span::styled(
            "Todavía no hay agentes. Pulsa n para crear el primero.",
            Style::default().fg(FG_DIM),
        ))]),
        AgentsState::Loaded(_) => None,
    };
    if let Some(lines) = placeholder {
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .agents()
        .iter()
        .map(|agent| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    agent.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    document_count_label(agent.document_count),
                    Style::default().fg(FG_DIM),
                )),
            ])
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(view.selected_index()));

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
