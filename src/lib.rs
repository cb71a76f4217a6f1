pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schedule;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod window;

pub use app::router;
pub use state::AppState;
pub use storage::{ensure_parent_dir, load_data, resolve_data_path};
