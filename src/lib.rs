pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod progress;
pub mod storage;
pub mod tui;
