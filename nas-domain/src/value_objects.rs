// Domain value objects
pub mod gesture_type;
pub mod identity;

pub use gesture_type::*;
pub use identity::*;
