//! Local package index used for transitive dependency discovery.
//!
//! The index is a TOML file with one table per package:
//!
//! ```toml
//! [package.flask]
//! dependencies = ["werkzeug>=3", "jinja2>=3.1", "click>=8.1"]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use reqpin_core::requirement::PackageName;
use reqpin_util::errors::ReqpinError;
use reqpin_util::fs::read_to_string;

/// On-disk shape of the index file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    package: BTreeMap<String, IndexEntry>,
}

/// One package's entry in the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Requirement lines for the package's direct dependencies.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Package name → direct dependencies, looked up case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: HashMap<String, IndexEntry>,
}

impl PackageIndex {
    /// An index that knows no packages.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load an index file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = read_to_string(path).map_err(|e| ReqpinError::Index {
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| {
            ReqpinError::Index {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse index content.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let file: IndexFile = toml::from_str(content)?;
        let packages = file
            .package
            .into_iter()
            .map(|(name, entry)| (name.to_ascii_lowercase(), entry))
            .collect();
        Ok(Self { packages })
    }

    /// Direct dependencies of `name`; empty for unknown packages.
    pub fn dependencies_of(&self, name: &PackageName) -> &[String] {
        self.packages
            .get(&name.folded())
            .map(|entry| entry.dependencies.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
