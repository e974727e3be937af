pub mod commands;
pub mod config;
pub mod install;
pub mod logging;
pub mod version;
