//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the forecast, scoring and publishing runs.

pub mod forecast;
pub mod publish;
pub mod scoring;

pub use forecast::{DiscoveryWindow, ForecastReport, ForecastService};
pub use publish::{Delivery, PublishService};
pub use scoring::{ScoringReport, ScoringService, SkippedRow};
