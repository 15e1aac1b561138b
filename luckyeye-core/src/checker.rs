//! Project-level entry point: detect, assemble rules, run.

use std::path::{Path, PathBuf};

use log::debug;

use crate::container::RunnerContainer;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::project::{Project, detect_project_type};
use crate::reporter::Reporter;
use crate::result::RunSummary;
use crate::rule::{Rule, RuleFactory};
use crate::rules::builtin_rules;

/// Validates one project directory.
///
/// Externally supplied rules run first, in the order their factories were added, followed by
/// the built-in rules for the detected project type.
pub struct ProjectChecker<F: FileSystem> {
    fs: F,
    root: PathBuf,
    factories: Vec<Box<dyn RuleFactory>>,
}

impl<F: FileSystem> ProjectChecker<F> {
    /// Create a checker for the project rooted at `root`.
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            factories: Vec::new(),
        }
    }

    /// Add a factory for an externally supplied rule.
    pub fn with_rule_factory<R: RuleFactory + 'static>(mut self, factory: R) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Detect the project type at the root.
    pub fn detect(&self) -> Result<Project> {
        let project_type = detect_project_type(&self.fs, &self.root)?;
        debug!("detected {project_type} project at {}", self.root.display());
        Ok(Project::new(self.root.clone(), project_type))
    }

    /// Build every rule that applies to the project, external rules first.
    pub async fn rule_list(&self, project: &Project) -> Result<Vec<Box<dyn Rule>>> {
        let mut rules = Vec::with_capacity(self.factories.len());
        for factory in &self.factories {
            rules.push(factory.create(project).await?);
        }
        rules.extend(builtin_rules(&self.fs, project));
        Ok(rules)
    }

    /// Detect the project, run all applicable rules and report through `reporter`.
    pub async fn check(&self, reporter: Box<dyn Reporter>) -> Result<RunSummary> {
        let project = self.detect()?;
        let mut container = RunnerContainer::new();
        container.load_rule_package()?;
        container.register_boxed_report(reporter);
        for rule in self.rule_list(&project).await? {
            container.add_boxed_rule(rule);
        }
        debug!("running {} rule(s)", container.rule_count());
        container.run().await
    }
}
