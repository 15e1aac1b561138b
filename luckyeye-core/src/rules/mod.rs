//! Built-in rules selected from the detected project type.

mod fyaml;
mod tsconfig;

pub use fyaml::{FYAML_GROUP, FYamlRule};
pub use tsconfig::{TSCONFIG_FILE, TSCONFIG_GROUP, TsConfigRule};

use crate::fs::FileSystem;
use crate::project::{Project, ProjectType};
use crate::rule::Rule;

/// Build the rules that apply to the project, reading their inputs through `fs`.
pub fn builtin_rules<F: FileSystem + ?Sized>(fs: &F, project: &Project) -> Vec<Box<dyn Rule>> {
    match project.project_type {
        ProjectType::Faas => vec![
            Box::new(FYamlRule::load(fs, project)) as Box<dyn Rule>,
            Box::new(TsConfigRule::load(fs, project)) as Box<dyn Rule>,
        ],
        ProjectType::Unknown => Vec::new(),
    }
}

#[cfg(test)]
pub(crate) async fn evaluate_rule(rule: &dyn Rule) -> Vec<(String, crate::CheckResult)> {
    let mut runner = crate::Runner::new();
    rule.apply(&mut runner).expect("apply rule");
    let mut outcomes = Vec::new();
    for group in runner.into_groups().expect("groups") {
        let (_, checks) = group.into_parts();
        for check in checks {
            let title = check.title().to_string();
            let result = check.evaluate().await.expect("evaluate");
            outcomes.push((title, result));
        }
    }
    outcomes
}
