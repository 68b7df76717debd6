pub mod identity_locks;

pub use identity_locks::*;
