use log::{debug, error, info};

use super::Requests;
use super::notice::Notices;
use crate::api::{AgentSummary, ApiError, SharedApi};

pub const LIST_LOAD_FAILED: &str = "No se pudieron cargar los agentes.";

/// Load state of the agent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(Vec<AgentSummary>),
    Failed(String),
}

struct ListFetched {
    seq: u64,
    result: Result<Vec<AgentSummary>, ApiError>,
}

/// Agent list screen state: fetched on open and after every creation.
pub struct AgentListView {
    api: SharedApi,
    state: ListState,
    selected: usize,
    fetch_seq: u64,
    requests: Requests<ListFetched>,
}

impl AgentListView {
    /// Creates the view and immediately issues the first fetch.
    pub fn open(api: SharedApi) -> Self {
        let mut view = Self {
            api,
            state: ListState::Loading,
            selected: 0,
            fetch_seq: 0,
            requests: Requests::new(),
        };
        view.refresh();
        view
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    pub fn agents(&self) -> &[AgentSummary] {
        match &self.state {
            ListState::Loaded(agents) => agents,
            _ => &[],
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&AgentSummary> {
        self.agents().get(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.agents().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    /// Re-issues `list_agents` in full. The list is replaced, never patched.
    pub fn refresh(&mut self) {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.state = ListState::Loading;
        let api = self.api.clone();
        debug!("fetching agent list (seq {})", seq);
        self.requests.spawn(async move {
            let result = api.list_agents().await;
            ListFetched { seq, result }
        });
    }

    /// Applies every fetch that settled since the last tick.
    pub fn poll(&mut self, notices: &mut Notices) {
        for fetched in self.requests.ready() {
            self.apply(fetched, notices);
        }
    }

    /// Waits for the next fetch to settle and applies it.
    pub async fn settle(&mut self, notices: &mut Notices) -> bool {
        match self.requests.next().await {
            Some(fetched) => {
                self.apply(fetched, notices);
                true
            }
            None => false,
        }
    }

    pub fn teardown(&mut self) {
        self.requests.cancel_all();
    }

    fn apply(&mut self, fetched: ListFetched, notices: &mut Notices) {
        if fetched.seq != self.fetch_seq {
            debug!("dropping superseded agent list (seq {})", fetched.seq);
            return;
        }
        match fetched.result {
            Ok(agents) => {
                info!("loaded {} agents", agents.len());
                self.selected = self.selected.min(agents.len().saturating_sub(1));
                self.state = ListState::Loaded(agents);
            }
            Err(err) => {
                error!("error fetching agents: {}", err);
                self.state = ListState::Failed(err.to_string());
                notices.error(LIST_LOAD_FAILED);
            }
        }
    }
}

/// Secondary line of a list entry, e.g. `2 documento(s)`.
pub fn document_count_label(count: usize) -> String {
    format!("{} documento(s)", count)
}
