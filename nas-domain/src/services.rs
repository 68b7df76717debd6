// Pure domain services: no I/O, every input passed in explicitly
pub mod gacha;
pub mod period;
pub mod quota;

pub use gacha::*;
pub use period::*;
pub use quota::*;
