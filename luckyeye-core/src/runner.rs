//! Group builder handed to rules.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::{LuckyeyeError, Result};
use crate::result::CheckResult;

/// Future produced by evaluating a check.
pub type CheckFuture = Pin<Box<dyn Future<Output = Result<CheckResult>> + Send>>;

type Evaluate = Box<dyn FnOnce() -> CheckFuture + Send>;

/// A single named validation.
///
/// The evaluation closure runs at most once; nothing happens until the container evaluates it.
pub struct Check {
    title: String,
    evaluate: Evaluate,
}

impl Check {
    /// Create a check from an infallible synchronous closure.
    pub fn new<F>(title: impl Into<String>, evaluate: F) -> Self
    where
        F: FnOnce() -> CheckResult + Send + 'static,
    {
        Self::fallible(title, move || Ok(evaluate()))
    }

    /// Create a check whose closure may return an engine error.
    ///
    /// An `Err` aborts the whole run; use [`CheckResult::Fail`] for project problems.
    pub fn fallible<F>(title: impl Into<String>, evaluate: F) -> Self
    where
        F: FnOnce() -> Result<CheckResult> + Send + 'static,
    {
        Self {
            title: title.into(),
            evaluate: Box::new(move || Box::pin(std::future::ready(evaluate()))),
        }
    }

    /// Create a check backed by an asynchronous closure.
    pub fn deferred<F, Fut>(title: impl Into<String>, evaluate: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CheckResult>> + Send + 'static,
    {
        Self {
            title: title.into(),
            evaluate: Box::new(move || Box::pin(evaluate())),
        }
    }

    /// Title shown in reports.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Consume the check and start its evaluation.
    pub fn evaluate(self) -> CheckFuture {
        (self.evaluate)()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("title", &self.title).finish()
    }
}

/// A named, ordered collection of checks.
#[derive(Debug)]
pub struct Group {
    name: String,
    checks: Vec<Check>,
}

impl Group {
    fn new(name: String) -> Self {
        Self {
            name,
            checks: Vec::new(),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks in declaration order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Split the group into its name and checks.
    pub fn into_parts(self) -> (String, Vec<Check>) {
        (self.name, self.checks)
    }
}

/// Fluent builder that accumulates groups of checks for one rule.
#[derive(Debug, Default)]
pub struct Runner {
    groups: Vec<Group>,
    current: Option<usize>,
    orphan: Option<String>,
}

impl Runner {
    /// Create an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a group, or re-enter one already opened on this runner.
    pub fn group(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let index = match self.groups.iter().position(|group| group.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(Group::new(name));
                self.groups.len() - 1
            }
        };
        self.current = Some(index);
        self
    }

    /// Append a synchronous check to the current group.
    pub fn check<F>(&mut self, title: impl Into<String>, evaluate: F) -> &mut Self
    where
        F: FnOnce() -> CheckResult + Send + 'static,
    {
        self.push(Check::new(title, evaluate))
    }

    /// Append a fallible synchronous check to the current group.
    pub fn try_check<F>(&mut self, title: impl Into<String>, evaluate: F) -> &mut Self
    where
        F: FnOnce() -> Result<CheckResult> + Send + 'static,
    {
        self.push(Check::fallible(title, evaluate))
    }

    /// Append an asynchronous check to the current group.
    pub fn check_async<F, Fut>(&mut self, title: impl Into<String>, evaluate: F) -> &mut Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CheckResult>> + Send + 'static,
    {
        self.push(Check::deferred(title, evaluate))
    }

    /// Append a prepared check to the current group.
    pub fn push(&mut self, check: Check) -> &mut Self {
        match self.current {
            Some(index) => self.groups[index].checks.push(check),
            None => {
                // Keep the first orphan; later ones add nothing to the diagnosis.
                if self.orphan.is_none() {
                    self.orphan = Some(check.title);
                }
            }
        }
        self
    }

    /// Finish building and return every group in the order it was first opened.
    pub fn into_groups(self) -> Result<Vec<Group>> {
        if let Some(title) = self.orphan {
            return Err(LuckyeyeError::CheckOutsideGroup { title });
        }
        Ok(self.groups)
    }
}
