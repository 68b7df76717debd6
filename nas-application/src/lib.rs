// NAS Application Layer

pub mod commands;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod state;

pub use engine::NasEngine;
pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
