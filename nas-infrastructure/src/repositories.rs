pub mod clickhouse_repo;
pub mod config_files;
pub mod memory_repo;

pub use clickhouse_repo::*;
pub use config_files::*;
pub use memory_repo::*;
