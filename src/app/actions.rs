use log::{debug, info};

use super::{App, DetailFocus, Screen};
use crate::views::AgentDetailView;

impl App {
    /// Opens the detail screen for the agent selected in the list.
    pub(crate) fn open_selected_agent(&mut self) {
        let Some(agent) = self.list.selected() else {
            return;
        };
        info!("opening agent {} ({})", agent.name, agent.id);
        let view = AgentDetailView::open(self.api.clone(), agent.id.clone());
        self.screen = Screen::Detail(Box::new(view));
        self.focus = DetailFocus::Chat;
    }

    /// Leaves the detail screen, dropping its requests, and re-fetches the
    /// list so document counts and names are current.
    pub(crate) fn back_to_list(&mut self) {
        if let Screen::Detail(view) = &mut self.screen {
            view.teardown();
        }
        debug!("returning to agent list");
        self.screen = Screen::List;
        self.overlay = None;
        self.focus = DetailFocus::Chat;
        self.list.refresh();
    }

    pub(crate) fn open_create_form(&mut self) {
        debug!("opening creation form");
        self.create_form.open();
    }

    pub(crate) fn toggle_detail_focus(&mut self) {
        self.focus = match self.focus {
            DetailFocus::Chat => DetailFocus::Documents,
            DetailFocus::Documents => DetailFocus::Chat,
        };
    }
}
