//! Reporter trait definitions.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::result::CheckResult;

/// Group a report event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContext {
    /// Group name.
    pub name: String,
    /// Zero-based position of the group within the run.
    pub index: usize,
}

impl GroupContext {
    /// Create a context for the group at `index`.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Event sink driven by [`crate::RunnerContainer::run`].
///
/// Per run the container calls `report_start` once, then for every group `report_group`
/// followed by one `report_check` per check, then `report_end` once. A run that aborts on an
/// engine error never reaches `report_end`.
pub trait Reporter: Send {
    /// Called once before the first rule is applied.
    fn report_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once per group, before any of its checks run.
    fn report_group(&mut self, group: &GroupContext) -> Result<()>;

    /// Called once per check with its classified outcome.
    fn report_check(&mut self, group: &GroupContext, title: &str, result: &CheckResult)
    -> Result<()>;

    /// Called right after `report_check` for a skipped check.
    fn report_skip(&mut self, _group: &GroupContext, _title: &str) -> Result<()> {
        Ok(())
    }

    /// Free-form informational message from the host.
    fn report_info(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    /// Called once after every rule and group has finished.
    fn report_end(&mut self) -> Result<()>;
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report_group(&mut self, _group: &GroupContext) -> Result<()> {
        Ok(())
    }

    fn report_check(
        &mut self,
        _group: &GroupContext,
        _title: &str,
        _result: &CheckResult,
    ) -> Result<()> {
        Ok(())
    }

    fn report_end(&mut self) -> Result<()> {
        Ok(())
    }
}
