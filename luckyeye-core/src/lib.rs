#![deny(missing_docs)]
//! Luckyeye core library.
//!
//! This crate contains the rule engine, reporters and built-in project rules
//! behind the `luckyeye` command line tool.

pub mod checker;
pub mod console;
pub mod container;
pub mod error;
pub mod fs;
pub mod project;
pub mod report;
pub mod reporter;
pub mod result;
pub mod rule;
pub mod rules;
pub mod runner;

pub use checker::ProjectChecker;
pub use console::ConsoleReporter;
pub use container::RunnerContainer;
pub use error::{LuckyeyeError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use project::{FAAS_MANIFEST, Project, ProjectType, detect_project_type};
pub use report::{CheckEntry, CheckReport, GroupReport, JsonReporter, render_json};
pub use reporter::{GroupContext, Reporter, SilentReporter};
pub use result::{CheckResult, ErrorRecord, RunSummary};
pub use rule::{Rule, RuleFactory, RuleFuture};
pub use rules::{FYamlRule, TsConfigRule, builtin_rules};
pub use runner::{Check, CheckFuture, Group, Runner};
