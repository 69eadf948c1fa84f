//! Package Registry
//!
//! Loads the installer catalogue. The registry is read once per run and
//! never modified by the checks.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CheckError, Result};
use crate::template;

/// Registry document format understood by the loader
pub const FORMAT_VERSION: u32 = 4;

/// Target architecture of an installer build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Architecture {
    /// All architectures, in the order they are checked
    pub const ALL: [Architecture; 2] = [Architecture::X86, Architecture::X86_64];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a package is installed and where its builds live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installer {
    /// Installer technology (e.g. "msi", "nsis", "zip")
    pub kind: String,
    /// Kind-specific options, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Map<String, serde_json::Value>>,
    /// URL template for the 32-bit build; empty when there is none
    #[serde(default)]
    pub x86: String,
    /// URL template for the 64-bit build; empty when there is none
    #[serde(default)]
    pub x86_64: String,
}

impl Installer {
    /// Create an installer with no builds
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: None,
            x86: String::new(),
            x86_64: String::new(),
        }
    }

    /// Set the URL template for an architecture
    pub fn with_url(mut self, arch: Architecture, url: impl Into<String>) -> Self {
        match arch {
            Architecture::X86 => self.x86 = url.into(),
            Architecture::X86_64 => self.x86_64 = url.into(),
        }
        self
    }
}

/// A single catalogue record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Unique package name (e.g. "7zip")
    pub name: String,
    /// Package version, substituted into URL templates
    pub version: String,
    pub installer: Installer,
}

impl PackageEntry {
    /// Raw URL template for an architecture (empty if the build is absent)
    pub fn url_for(&self, arch: Architecture) -> &str {
        match arch {
            Architecture::X86 => &self.installer.x86,
            Architecture::X86_64 => &self.installer.x86_64,
        }
    }

    /// Expand a URL template against this entry
    pub fn expand(&self, template: &str) -> String {
        template::expand(template, self)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    version: u32,
    #[serde(default)]
    packages: Vec<PackageEntry>,
}

/// The package catalogue, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    packages: HashMap<String, PackageEntry>,
}

impl Registry {
    /// Load a registry document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: RegistryDocument =
            serde_json::from_str(&content).map_err(|source| CheckError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let registry = Self::from_document(document)?;
        debug!(path = %path.display(), packages = registry.len(), "loaded registry");
        Ok(registry)
    }

    /// Parse a registry document held in memory
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(content)?)
    }

    /// Build a registry from entries, rejecting duplicate names
    pub fn from_entries(entries: impl IntoIterator<Item = PackageEntry>) -> Result<Self> {
        let mut packages = HashMap::new();
        for entry in entries {
            if packages.contains_key(&entry.name) {
                return Err(CheckError::DuplicatePackage(entry.name));
            }
            packages.insert(entry.name.clone(), entry);
        }
        Ok(Self { packages })
    }

    fn from_document(document: RegistryDocument) -> Result<Self> {
        if document.version != FORMAT_VERSION {
            return Err(CheckError::UnsupportedVersion {
                found: document.version,
                expected: FORMAT_VERSION,
            });
        }
        Self::from_entries(document.packages)
    }

    /// Package names in ascending order
    pub fn sorted_package_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.packages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(name: &str) -> PackageEntry {
        PackageEntry {
            name: name.to_string(),
            version: "1.0".to_string(),
            installer: Installer::new("nsis"),
        }
    }

    #[test]
    fn test_sorted_package_names() {
        let registry = Registry::from_entries(vec![entry("b"), entry("a"), entry("c")]).unwrap();
        assert_eq!(registry.sorted_package_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_package_rejected() {
        let result = Registry::from_entries(vec![entry("git"), entry("git")]);
        assert!(matches!(result, Err(CheckError::DuplicatePackage(name)) if name == "git"));
    }

    #[test]
    fn test_missing_architecture_is_empty() {
        let registry = Registry::from_json_str(
            r#"{
                "version": 4,
                "packages": [
                    {"name": "foo", "version": "1.0", "installer": {"kind": "as-is", "x86": "http://example.com/foo.exe"}}
                ]
            }"#,
        )
        .unwrap();

        let foo = registry.get("foo").unwrap();
        assert_eq!(foo.url_for(Architecture::X86), "http://example.com/foo.exe");
        assert_eq!(foo.url_for(Architecture::X86_64), "");
    }

    #[test]
    fn test_unsupported_version() {
        let result = Registry::from_json_str(r#"{"version": 3, "packages": []}"#);
        assert!(matches!(
            result,
            Err(CheckError::UnsupportedVersion { found: 3, expected: 4 })
        ));
    }

    #[test]
    fn test_load_reports_path_on_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        match Registry::load(file.path()) {
            Err(CheckError::Json { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("Expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = Registry::load("/nonexistent/registry.json");
        assert!(matches!(result, Err(CheckError::Io { .. })));
    }
}
