use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use super::{App, DetailFocus, Screen};
use crate::api::SharedApi;
use crate::views::{AgentForm, AgentListView, Notices};

impl App {
    /// Creates the application on the agent list, whose first fetch is
    /// issued immediately. Must be called inside a Tokio runtime.
    pub fn new(api: SharedApi, workspace_root: PathBuf) -> Self {
        let workspace_root = workspace_root.canonicalize().unwrap_or(workspace_root);
        debug!("initializing app in {}", workspace_root.display());

        Self {
            should_quit: false,
            list: AgentListView::open(api.clone()),
            create_form: AgentForm::create(api.clone()),
            api,
            workspace_root,
            screen: Screen::List,
            focus: DetailFocus::Chat,
            overlay: None,
            notices: Notices::default(),
            tick_rate: Duration::from_millis(100),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }
}
