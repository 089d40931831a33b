pub mod api;
pub mod config;
pub mod error;
mod main_lib;

pub use main_lib::{
    build_state, build_state_with_source, init_tracing, AppState, ResponseCaches, RouteLimiters,
};
