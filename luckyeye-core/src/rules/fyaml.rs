//! Checks for the function-service manifest.

use std::sync::Arc;

use serde_yaml::Value;

use crate::error::Result;
use crate::fs::FileSystem;
use crate::project::{FAAS_MANIFEST, Project};
use crate::result::CheckResult;
use crate::rule::Rule;
use crate::runner::Runner;

/// Group name for manifest checks.
pub const FYAML_GROUP: &str = "f.yml check";

/// Validates the layout of `f.yml`.
///
/// The manifest is read and parsed once when the rule is built; every check shares the result.
#[derive(Debug, Clone)]
pub struct FYamlRule {
    manifest: Arc<std::result::Result<Value, String>>,
}

impl FYamlRule {
    /// Read and parse the manifest under the project root.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, project: &Project) -> Self {
        let parsed = fs
            .read_to_string(&project.path(FAAS_MANIFEST))
            .map_err(|err| err.to_string())
            .and_then(|contents| parse(&contents));
        Self {
            manifest: Arc::new(parsed),
        }
    }

    /// Parse manifest text directly.
    pub fn from_source(contents: &str) -> Self {
        Self {
            manifest: Arc::new(parse(contents)),
        }
    }
}

fn parse(contents: &str) -> std::result::Result<Value, String> {
    let mut value: Value = serde_yaml::from_str(contents).map_err(|err| err.to_string())?;
    // `<<` merge keys are resolved explicitly; serde_yaml keeps them as plain entries.
    value.apply_merge().map_err(|err| err.to_string())?;
    Ok(value)
}

impl Rule for FYamlRule {
    fn apply(&self, runner: &mut Runner) -> Result<()> {
        let format = Arc::clone(&self.manifest);
        let service = Arc::clone(&self.manifest);
        let provider = Arc::clone(&self.manifest);
        let triggers = Arc::clone(&self.manifest);
        let http = Arc::clone(&self.manifest);
        let package = Arc::clone(&self.manifest);

        runner
            .group(FYAML_GROUP)
            .check("format", move || check_format(&format))
            .check("service", move || check_service(document(&service)))
            .check("provider", move || check_provider(document(&provider)))
            .check("trigger list", move || check_trigger_list(document(&triggers)))
            .check("http trigger", move || check_http_trigger(document(&http)))
            .check("package in/exclude type", move || {
                check_package(document(&package))
            });
        Ok(())
    }
}

fn document(manifest: &std::result::Result<Value, String>) -> Option<&Value> {
    manifest.as_ref().ok()
}

fn check_format(manifest: &std::result::Result<Value, String>) -> CheckResult {
    match manifest {
        Ok(_) => CheckResult::Pass,
        Err(err) => CheckResult::fail(format!("Yaml format error: {err}")),
    }
}

fn check_service(doc: Option<&Value>) -> CheckResult {
    if truthy(field(doc, "service")).is_none() {
        return CheckResult::fail("need service config");
    }
    CheckResult::Pass
}

fn check_provider(doc: Option<&Value>) -> CheckResult {
    let Some(provider) = truthy(field(doc, "provider")) else {
        return CheckResult::fail("need provider config");
    };
    if truthy(provider.get("name")).is_none() {
        return CheckResult::fail("need provider name, e.g. aliyun");
    }
    CheckResult::Pass
}

fn check_trigger_list(doc: Option<&Value>) -> CheckResult {
    let Some(functions) = truthy(field(doc, "functions")) else {
        return CheckResult::Skip;
    };
    for (name, info) in function_entries(functions) {
        // Functions without triggers are allowed.
        let Some(events) = truthy(info.get("events")) else {
            continue;
        };
        if !events.is_sequence() {
            return CheckResult::fail(format!("function '{name}' events type need array"));
        }
    }
    CheckResult::Pass
}

fn check_http_trigger(doc: Option<&Value>) -> CheckResult {
    let Some(functions) = truthy(field(doc, "functions")) else {
        return CheckResult::Skip;
    };
    for (name, info) in function_entries(functions) {
        let Some(Value::Sequence(events)) = truthy(info.get("events")) else {
            continue;
        };
        let triggers = events
            .iter()
            .filter_map(|event| truthy(event.get("http")).or_else(|| truthy(event.get("apigw"))));
        for trigger in triggers {
            if truthy(trigger.get("path")).is_none() {
                return CheckResult::fail(format!("function '{name}' http trigger need path"));
            }
            if let Some(method) = truthy(trigger.get("method")) {
                if !method.is_sequence() {
                    return CheckResult::fail(format!(
                        "function '{name}' http trigger method type need array"
                    ));
                }
            }
        }
    }
    CheckResult::Pass
}

fn check_package(doc: Option<&Value>) -> CheckResult {
    let Some(package) = truthy(field(doc, "package")) else {
        return CheckResult::Skip;
    };
    for key in ["include", "exclude"] {
        if let Some(list) = truthy(package.get(key)) {
            if !list.is_sequence() {
                return CheckResult::fail(format!("package {key} type need array"));
            }
        }
    }
    CheckResult::Pass
}

fn field<'a>(doc: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    doc?.get(key)
}

/// Keep the value only if it counts as set: not null, `false`, zero, or an empty string.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| is_set(value))
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_none_or(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_set(&tagged.value),
    }
}

/// Named function entries. A sequence is keyed by index, scalars have no entries.
fn function_entries(functions: &Value) -> Vec<(String, &Value)> {
    match functions {
        Value::Mapping(map) => map.iter().map(|(key, info)| (key_name(key), info)).collect(),
        Value::Sequence(list) => list
            .iter()
            .enumerate()
            .map(|(index, info)| (index.to_string(), info))
            .collect(),
        _ => Vec::new(),
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    }
}
