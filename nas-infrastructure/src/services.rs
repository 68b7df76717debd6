pub mod health_service;
pub mod random_source;
pub mod system_clock;

pub use health_service::*;
pub use random_source::*;
pub use system_clock::*;
