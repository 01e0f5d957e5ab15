//! Screen state, independent of the terminal.
//!
//! Each view owns its server-synchronised state and a [`Requests`] scope for
//! the calls it issued; the UI layer only reads from here.

pub mod chat;
pub mod composer;
pub mod confirm;
pub mod detail;
pub mod form;
pub mod list;
pub mod notice;
mod requests;

pub use chat::{ChatMessage, MessageId, Sender, Transcript};
pub use composer::Composer;
pub use confirm::ConfirmDialog;
pub use detail::{AgentDetailView, AgentLoad, DetailSignal, SendOutcome};
pub use form::{AgentDraft, AgentForm, FormField, FormMode, FormSignal, Submit};
pub use list::{AgentListView, ListState, document_count_label};
pub use notice::{Notice, NoticeLevel, Notices};
pub use requests::Requests;
