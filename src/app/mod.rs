//! Application state and input routing.
//!
//! `App` owns one [`AgentListView`](crate::views::AgentListView), at most one
//! detail view, the creation form and the overlay stack. Keys are routed in
//! `keyboard`, settled requests are applied in `tick`.

/// Navigation between screens.
mod actions;
/// `App` construction.
mod init;
/// Keyboard routing.
mod keyboard;
/// Confirmation dialogs and the upload prompt.
mod overlays;
/// Core state types.
mod state;
/// Periodic polling of the views.
mod tick;

pub use overlays::{DELETE_AGENT_TITLE, DELETE_DOCUMENT_TITLE, UPLOAD_TITLE};
pub use state::{
    App, ConfirmAction, ConfirmState, DetailFocus, InputPromptState, OverlayState, Screen,
};
