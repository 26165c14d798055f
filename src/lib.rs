pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod predict;
pub mod service;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
