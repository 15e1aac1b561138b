//! Rule trait definitions.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::project::Project;
use crate::runner::Runner;

/// A unit that contributes groups of checks to a run.
///
/// `apply` may be called once per run, so it must build fresh checks every time. State a rule
/// reads up front (a parsed config document, say) should be shared with its checks through an
/// `Arc` and never mutated afterwards.
pub trait Rule: Send + Sync {
    /// Populate the runner with this rule's groups.
    fn apply(&self, runner: &mut Runner) -> Result<()>;
}

impl<F> Rule for F
where
    F: Fn(&mut Runner) -> Result<()> + Send + Sync,
{
    fn apply(&self, runner: &mut Runner) -> Result<()> {
        self(runner)
    }
}

/// Future produced while building a rule.
pub type RuleFuture<'a> = Pin<Box<dyn Future<Output = Result<Box<dyn Rule>>> + Send + 'a>>;

/// Builds a rule for a project, possibly after asynchronous setup.
pub trait RuleFactory: Send + Sync {
    /// Create the rule for the given project.
    fn create<'a>(&'a self, project: &'a Project) -> RuleFuture<'a>;
}

impl<F> RuleFactory for F
where
    F: Fn(&Project) -> Result<Box<dyn Rule>> + Send + Sync,
{
    fn create<'a>(&'a self, project: &'a Project) -> RuleFuture<'a> {
        Box::pin(std::future::ready(self(project)))
    }
}
