// Domain entities
pub mod api;
pub mod gacha_snapshot;
pub mod gesture_vocabulary;
pub mod prize_table;
pub mod runtime_config;
pub mod send_event;

pub use api::*;
pub use gacha_snapshot::*;
pub use gesture_vocabulary::*;
pub use prize_table::*;
pub use runtime_config::*;
pub use send_event::*;
