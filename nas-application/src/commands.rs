pub mod config_commands;
pub mod gacha_commands;
pub mod send_commands;
