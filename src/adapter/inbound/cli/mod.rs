//! CLI module graph.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod notify;
pub mod output;
pub mod paths;
pub mod predict;
pub mod report;
pub mod score;
pub mod show;
