pub mod backup;
pub mod command_utils;
pub mod config;
pub mod error;
pub mod restore;
