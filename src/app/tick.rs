use std::time::Instant;

use log::info;

use super::{App, OverlayState, Screen};
use crate::views::{DetailSignal, FormSignal};

impl App {
    /// Called on every tick of the event loop: applies whatever the views'
    /// requests settled since the last tick and expires old notices.
    pub fn on_tick(&mut self) {
        self.list.poll(&mut self.notices);

        if let Some(FormSignal::Created { agent_id }) = self.create_form.poll(&mut self.notices) {
            info!(
                "agent {} created, reloading list",
                agent_id.as_deref().unwrap_or("(id not echoed)")
            );
            self.list.refresh();
        }

        let signals = match &mut self.screen {
            Screen::Detail(view) => view.poll(&mut self.notices),
            Screen::List => Vec::new(),
        };
        for signal in signals {
            self.handle_detail_signal(signal);
        }

        self.release_settled_confirm();
        self.notices.prune(Instant::now());
    }

    fn handle_detail_signal(&mut self, signal: DetailSignal) {
        match signal {
            DetailSignal::AgentUpdated { agent_id } => {
                info!("agent {} updated, reloading list", agent_id);
                self.list.refresh();
            }
            DetailSignal::AgentDeleted { agent_id } => {
                info!("agent {} deleted, leaving detail view", agent_id);
                self.back_to_list();
            }
        }
    }

    /// Closes a confirmation whose request has settled.
    fn release_settled_confirm(&mut self) {
        let settled = match &self.overlay {
            Some(OverlayState::Confirm(state)) => {
                state.dispatched && !self.action_busy(state.dialog.action())
            }
            _ => false,
        };
        if settled {
            self.close_overlay();
        }
    }
}
