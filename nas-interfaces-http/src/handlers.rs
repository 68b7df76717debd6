pub mod config_handlers;
pub mod gacha_handlers;
pub mod ops_handlers;
pub mod quota_handlers;
pub mod send_handlers;

pub use config_handlers::*;
pub use gacha_handlers::*;
pub use ops_handlers::*;
pub use quota_handlers::*;
pub use send_handlers::*;
