pub mod commands;
pub mod device;
