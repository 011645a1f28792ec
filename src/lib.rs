pub mod api_client;
pub mod app;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod filters;
pub mod format;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod reports;
pub mod sample;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use filters::Dashboard;
pub use state::AppState;
pub use storage::load_filters;
