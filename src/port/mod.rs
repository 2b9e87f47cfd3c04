//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the code-hosting API, the artifact store, notification sinks).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌──────────┐           ┌─────────────┐              ┌───────────┐
//! │Telemetry │           │ Artifacts + │              │ Notifier  │
//! │ Adapter  │           │   Ledger    │              │  Adapter  │
//! └──────────┘           └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`RepoDiscovery`], [`TelemetryProvider`] - Repository search and telemetry
//! - [`ArtifactStore`] - Dated snapshots, predictions, posts, summaries
//! - [`OutcomeLedger`] - Append-only outcome ledger
//! - [`Notifier`] - Digest delivery (webhook, logging)

pub mod outbound;

pub use outbound::notifier::{LogNotifier, Notifier, NotifierRegistry, NullNotifier};
pub use outbound::store::{ArtifactKind, ArtifactStore, OutcomeLedger};
pub use outbound::telemetry::{DiscoveryQuery, RepoDiscovery, TelemetryProvider};
