//! Download link reachability
//!
//! Walks the registry in name order and issues one GET per installer URL.
//! A link passes when it answers `200 OK` with an installer-like content
//! type. Failures are logged and collected; they never stop the walk.

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content_type::ContentTypePolicy;
use crate::error::Result;
use crate::registry::{Architecture, PackageEntry, Registry};

/// Status line and content type of a probed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Raw `Content-Type` header value, empty when absent
    pub content_type: String,
}

/// Transport-level failure while probing a URL
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ProbeError(pub String);

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        Self(e.to_string())
    }
}

/// Issues the GET request for a single link
pub trait Probe {
    fn get(&self, url: &str) -> std::result::Result<ProbeResponse, ProbeError>;
}

impl<P: Probe + ?Sized> Probe for &P {
    fn get(&self, url: &str) -> std::result::Result<ProbeResponse, ProbeError> {
        (**self).get(url)
    }
}

/// Probe backed by a blocking reqwest client.
///
/// Redirects and timeouts are reqwest's defaults.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    fn get(&self, url: &str) -> std::result::Result<ProbeResponse, ProbeError> {
        let response = self.client.get(url).send()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();

        // The body is never read; dropping the response releases the connection.
        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type,
        })
    }
}

/// Why a link failed
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LinkFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("status code wasn't 200 OK (got {0})")]
    Status(u16),

    #[error("the content type was {0:?}")]
    ContentType(String),
}

/// Result of checking one (package, architecture) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// No build for this architecture
    Skipped,
    Passed,
    Failed(LinkFailure),
}

impl LinkOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LinkOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheck {
    pub package: String,
    pub arch: Architecture,
    /// Expanded URL; empty when skipped
    pub url: String,
    #[serde(flatten)]
    pub outcome: LinkOutcome,
}

/// Every link visited during one run, in visiting order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReachabilityReport {
    /// Set when short mode suppressed the whole check
    pub skipped_run: bool,
    pub links: Vec<LinkCheck>,
}

impl ReachabilityReport {
    fn skipped() -> Self {
        Self {
            skipped_run: true,
            links: Vec::new(),
        }
    }

    /// True unless at least one link failed
    pub fn passed(&self) -> bool {
        !self.links.iter().any(|l| l.outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &LinkCheck> {
        self.links.iter().filter(|l| l.outcome.is_failure())
    }

    pub fn passed_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| l.outcome == LinkOutcome::Passed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| l.outcome == LinkOutcome::Skipped)
            .count()
    }
}

/// Sequential link checker over a registry
pub struct ReachabilityChecker<P> {
    probe: P,
    policy: &'static ContentTypePolicy,
    short: bool,
}

impl<P: Probe> ReachabilityChecker<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            policy: ContentTypePolicy::global(),
            short: false,
        }
    }

    /// Skip all probing (short mode)
    pub fn short(mut self, short: bool) -> Self {
        self.short = short;
        self
    }

    /// Check every link in the registry
    pub fn check(&self, registry: &Registry) -> ReachabilityReport {
        if self.short {
            info!("short mode: skipping reachability checks");
            return ReachabilityReport::skipped();
        }

        let mut report = ReachabilityReport::default();
        for name in registry.sorted_package_names() {
            let Some(entry) = registry.get(name) else {
                continue;
            };
            for arch in Architecture::ALL {
                report.links.push(self.check_arch(entry, arch));
            }
        }

        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "reachability check finished"
        );
        report
    }

    fn check_arch(&self, entry: &PackageEntry, arch: Architecture) -> LinkCheck {
        let template = entry.url_for(arch);
        if template.is_empty() {
            return LinkCheck {
                package: entry.name.clone(),
                arch,
                url: String::new(),
                outcome: LinkOutcome::Skipped,
            };
        }

        let url = entry.expand(template);
        let outcome = match self.check_link(&url) {
            Ok(()) => {
                debug!(package = %entry.name, %arch, %url, "link ok");
                LinkOutcome::Passed
            }
            Err(reason) => {
                warn!(package = %entry.name, %arch, %url, %reason, "link check failed");
                LinkOutcome::Failed(reason)
            }
        };

        LinkCheck {
            package: entry.name.clone(),
            arch,
            url,
            outcome,
        }
    }

    fn check_link(&self, url: &str) -> std::result::Result<(), LinkFailure> {
        let response = self
            .probe
            .get(url)
            .map_err(|e| LinkFailure::Transport(e.to_string()))?;

        if response.status != 200 {
            return Err(LinkFailure::Status(response.status));
        }

        if !self.policy.accepts(url, &response.content_type) {
            return Err(LinkFailure::ContentType(response.content_type));
        }

        Ok(())
    }
}
