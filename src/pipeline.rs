//! Validation pipeline
//!
//! Runs the schema check, then the reachability check. The two are
//! independent: a schema-invalid registry is still walked for broken links,
//! as long as the loader can read it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::CheckConfig;
use crate::error::Result;
use crate::reachability::{Probe, ReachabilityChecker, ReachabilityReport};
use crate::registry::Registry;
use crate::schema::{self, SchemaReport};

/// Combined result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub schema: SchemaReport,
    pub reachability: ReachabilityReport,
}

impl PipelineReport {
    pub fn passed(&self) -> bool {
        self.schema.valid && self.reachability.passed()
    }
}

/// Both checks, driven by one configuration
pub struct Pipeline<'a> {
    config: &'a CheckConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a CheckConfig) -> Self {
        Self { config }
    }

    /// Validate the registry document against its schema
    pub fn run_schema(&self) -> Result<SchemaReport> {
        schema::validate_files(&self.config.paths.schema, &self.config.paths.registry)
    }

    /// Load the registry and probe every download link
    pub fn run_reachability<P: Probe>(&self, probe: P) -> Result<ReachabilityReport> {
        let checker = ReachabilityChecker::new(probe).short(self.config.reachability.short);
        if self.config.reachability.short {
            return Ok(checker.check(&Registry::default()));
        }

        let registry = Registry::load(&self.config.paths.registry)?;
        Ok(checker.check(&registry))
    }

    /// Run both checks
    pub fn run<P: Probe>(&self, probe: P) -> Result<PipelineReport> {
        let schema = self.run_schema()?;
        let reachability = self.run_reachability(probe)?;

        let report = PipelineReport {
            generated_at: Utc::now(),
            schema,
            reachability,
        };
        info!(passed = report.passed(), "validation pipeline finished");
        Ok(report)
    }
}
