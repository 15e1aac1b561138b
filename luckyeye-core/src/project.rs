//! Project detection.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fs::FileSystem;

/// Name of the function-service manifest at the project root.
pub const FAAS_MANIFEST: &str = "f.yml";

/// Manifest key that marks an application deployment rather than a function service.
const DEPLOY_TYPE_MARKER: &str = "deployType";

/// Kind of project found at the root.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// A function-as-a-service project described by `f.yml`.
    Faas,
    /// Anything else; no built-in rules apply.
    Unknown,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Faas => write!(f, "faas"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Project state that rules are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project root directory.
    pub root: PathBuf,
    /// Detected project kind.
    pub project_type: ProjectType,
}

impl Project {
    /// Create a project description.
    pub fn new(root: impl Into<PathBuf>, project_type: ProjectType) -> Self {
        Self {
            root: root.into(),
            project_type,
        }
    }

    /// Resolve a path relative to the project root.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Detect the project kind from the manifest at the root.
///
/// A project is [`ProjectType::Faas`] when `f.yml` exists and does not mention `deployType`.
pub fn detect_project_type<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<ProjectType> {
    let manifest = root.join(FAAS_MANIFEST);
    if !fs.is_file(&manifest) {
        return Ok(ProjectType::Unknown);
    }
    let contents = fs.read_to_string(&manifest)?;
    if contents.contains(DEPLOY_TYPE_MARKER) {
        return Ok(ProjectType::Unknown);
    }
    Ok(ProjectType::Faas)
}
