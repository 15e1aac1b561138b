//! Check outcomes and the records aggregated from them.

use serde::{Deserialize, Serialize};

/// Outcome of a single check evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CheckResult {
    /// The project satisfies the check.
    Pass,
    /// The project violates the check; the message tells the user what to fix.
    Fail(String),
    /// The check does not apply to this project.
    Skip,
}

impl CheckResult {
    /// Build a failing outcome from any string-like message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    /// Returns true for [`CheckResult::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true for [`CheckResult::Fail`].
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// Returns true for [`CheckResult::Skip`].
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Fail(message) => Some(message),
            Self::Pass | Self::Skip => None,
        }
    }
}

/// A failed check, attributed to the group it ran in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Name of the group the check belongs to.
    pub group: String,
    /// Title of the failed check.
    pub title: String,
    /// Failure message reported by the check.
    pub message: String,
}

/// Tallies for one container run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of groups executed.
    pub groups: usize,
    /// Number of passing checks.
    pub passed: usize,
    /// Number of failing checks.
    pub failed: usize,
    /// Number of skipped checks.
    pub skipped: usize,
}

impl RunSummary {
    /// Count one classified outcome.
    pub fn record(&mut self, result: &CheckResult) {
        match result {
            CheckResult::Pass => self.passed += 1,
            CheckResult::Fail(_) => self.failed += 1,
            CheckResult::Skip => self.skipped += 1,
        }
    }

    /// True when no check failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
