pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use lifecycle::LifecycleManager;
pub use state::AppState;
