//! Checks for the TypeScript compiler configuration.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::fs::FileSystem;
use crate::project::Project;
use crate::result::CheckResult;
use crate::rule::Rule;
use crate::runner::Runner;

/// Group name for tsconfig checks.
pub const TSCONFIG_GROUP: &str = "tsconfig check";
/// Compiler configuration file at the project root.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Highest supported target (es2018) on the ordinal scale used by [`target_level`].
const MAX_TARGET_LEVEL: u8 = 9;

#[derive(Debug)]
enum TsConfig {
    Missing,
    Invalid(String),
    Parsed(Value),
}

/// Validates `tsconfig.json`: presence, syntax and compiler target.
#[derive(Debug, Clone)]
pub struct TsConfigRule {
    config: Arc<TsConfig>,
}

impl TsConfigRule {
    /// Read and parse `tsconfig.json` under the project root.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, project: &Project) -> Self {
        let path = project.path(TSCONFIG_FILE);
        let config = if !fs.is_file(&path) {
            TsConfig::Missing
        } else {
            match fs.read_to_string(&path) {
                Ok(contents) => parse(&contents),
                Err(err) => TsConfig::Invalid(err.to_string()),
            }
        };
        Self {
            config: Arc::new(config),
        }
    }

    /// Parse configuration text directly.
    pub fn from_source(contents: &str) -> Self {
        Self {
            config: Arc::new(parse(contents)),
        }
    }

    /// Rule for a project without `tsconfig.json`.
    pub fn missing() -> Self {
        Self {
            config: Arc::new(TsConfig::Missing),
        }
    }
}

fn parse(contents: &str) -> TsConfig {
    match serde_json::from_str(contents) {
        Ok(value) => TsConfig::Parsed(value),
        Err(err) => TsConfig::Invalid(err.to_string()),
    }
}

impl Rule for TsConfigRule {
    fn apply(&self, runner: &mut Runner) -> Result<()> {
        let exists = Arc::clone(&self.config);
        let syntax = Arc::clone(&self.config);
        let target = Arc::clone(&self.config);

        runner
            .group(TSCONFIG_GROUP)
            .check("exists", move || check_exists(&exists))
            .check("parse", move || check_parse(&syntax))
            .check("compiler target", move || check_target(&target));
        Ok(())
    }
}

fn check_exists(config: &TsConfig) -> CheckResult {
    match config {
        TsConfig::Missing => CheckResult::fail("tsconfig.json not exists"),
        _ => CheckResult::Pass,
    }
}

fn check_parse(config: &TsConfig) -> CheckResult {
    match config {
        TsConfig::Missing => CheckResult::Skip,
        TsConfig::Invalid(err) => CheckResult::fail(format!("tsconfig parse error: {err}")),
        TsConfig::Parsed(_) => CheckResult::Pass,
    }
}

fn check_target(config: &TsConfig) -> CheckResult {
    let TsConfig::Parsed(value) = config else {
        return CheckResult::Skip;
    };
    let target = match value.pointer("/compilerOptions/target") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return CheckResult::Skip,
        Some(Value::String(target)) if target.is_empty() => return CheckResult::Skip,
        Some(Value::String(target)) => target.clone(),
        Some(other) => other.to_string(),
    };
    match target_level(&target) {
        None => CheckResult::fail(format!("tsconfig target version '{target}' not support")),
        Some(level) if level > MAX_TARGET_LEVEL => {
            CheckResult::fail("tsconfig target need ≤ es2018")
        }
        Some(_) => CheckResult::Pass,
    }
}

/// Ordinal of an ECMAScript target, ignoring case and whitespace.
fn target_level(target: &str) -> Option<u8> {
    let normalized: String = target
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let level = match normalized.as_str() {
        "es3" => 3,
        "es5" => 5,
        "es6" | "es2015" => 6,
        "es7" | "es2016" => 7,
        "es2017" => 8,
        "es2018" => 9,
        "es2019" => 10,
        "es2020" => 11,
        "es2021" | "esnext" => 12,
        _ => return None,
    };
    Some(level)
}
