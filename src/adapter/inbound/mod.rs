//! Inbound adapters: the command-line driver.

pub mod cli;
