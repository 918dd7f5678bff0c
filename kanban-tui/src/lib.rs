//! Kanban TUI library exports.

pub mod api_client;
pub mod board;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod events;
pub mod keys;
pub mod login;
pub mod nav;
pub mod notifications;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod views;
pub mod widgets;
