//! Package Registry Checks
//!
//! Validation for package-installer registries: a catalogue of packages with
//! per-architecture download URLs.
//!
//! ## Checks
//!
//! - **Schema**: the registry document conforms to its JSON Schema
//! - **Reachability**: every download URL answers `200 OK` with an
//!   installer-like content type
//!
//! ## Flow
//!
//! ```text
//! registry-schema.json ─┐
//!                       ├─> schema::validate_files ──> SchemaReport
//! registry.json ────────┤
//!                       └─> Registry::load ──> ReachabilityChecker ──> ReachabilityReport
//!                                                    │
//!                                          Probe (GET, one per URL)
//! ```

pub mod config;
pub mod content_type;
pub mod error;
pub mod pipeline;
pub mod reachability;
pub mod registry;
pub mod schema;
pub mod template;

pub use config::CheckConfig;
pub use content_type::ContentTypePolicy;
pub use error::{CheckError, Result};
pub use pipeline::{Pipeline, PipelineReport};
pub use reachability::{
    HttpProbe, LinkCheck, LinkFailure, LinkOutcome, Probe, ProbeError, ProbeResponse,
    ReachabilityChecker, ReachabilityReport,
};
pub use registry::{Architecture, Installer, PackageEntry, Registry};
pub use schema::SchemaReport;
pub use template::expand;
