//! Infrastructure configuration modules.

pub mod logging;
pub mod scoring;
pub mod settings;
pub mod webhook;

pub use settings::Config;
