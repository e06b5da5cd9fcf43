pub mod ai_environment;
pub mod api;
pub mod auth;
pub mod chat_events;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, build_state_with_registry, init_tracing, AppState};
