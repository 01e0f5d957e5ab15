//! Terminal client for a retrieval-augmented agents backend: list, create,
//! edit and delete agents, manage their documents and chat with them.

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod tui;
pub mod ui;
pub mod views;
