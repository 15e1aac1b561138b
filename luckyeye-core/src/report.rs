//! Structured report output.

use std::io::{self, Stdout, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reporter::{GroupContext, Reporter};
use crate::result::{CheckResult, ErrorRecord};

/// Outcome of one check within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    /// Check title.
    pub title: String,
    /// Classified outcome.
    pub result: CheckResult,
}

/// A group and the outcomes of its checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Group name.
    pub name: String,
    /// Check outcomes in execution order.
    pub checks: Vec<CheckEntry>,
}

/// Full report for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Every group in execution order.
    pub groups: Vec<GroupReport>,
    /// Failures in execution order.
    pub errors: Vec<ErrorRecord>,
    /// True when no check failed.
    pub all_passed: bool,
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Reporter that collects the whole run and writes one JSON document at the end.
pub struct JsonReporter<W: Write + Send> {
    out: W,
    report: CheckReport,
}

impl JsonReporter<Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonReporter<W> {
    /// Reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            report: CheckReport::default(),
        }
    }

    /// Report collected so far.
    pub fn report(&self) -> &CheckReport {
        &self.report
    }

    /// Discard collected results.
    pub fn reset(&mut self) {
        self.report = CheckReport::default();
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn group_mut(&mut self, group: &GroupContext) -> &mut GroupReport {
        let known = self
            .report
            .groups
            .get(group.index)
            .is_some_and(|existing| existing.name == group.name);
        if !known {
            self.report.groups.push(GroupReport {
                name: group.name.clone(),
                checks: Vec::new(),
            });
            let last = self.report.groups.len() - 1;
            return &mut self.report.groups[last];
        }
        &mut self.report.groups[group.index]
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn report_start(&mut self) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn report_group(&mut self, group: &GroupContext) -> Result<()> {
        self.group_mut(group);
        Ok(())
    }

    fn report_check(
        &mut self,
        group: &GroupContext,
        title: &str,
        result: &CheckResult,
    ) -> Result<()> {
        if let CheckResult::Fail(message) = result {
            self.report.errors.push(ErrorRecord {
                group: group.name.clone(),
                title: title.to_string(),
                message: message.clone(),
            });
        }
        self.group_mut(group).checks.push(CheckEntry {
            title: title.to_string(),
            result: result.clone(),
        });
        Ok(())
    }

    fn report_end(&mut self) -> Result<()> {
        self.report.all_passed = self.report.errors.is_empty();
        let rendered = render_json(&self.report)?;
        writeln!(self.out, "{rendered}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonReporter, render_json};
    use crate::reporter::{GroupContext, Reporter};
    use crate::result::CheckResult;

    #[test]
    fn writes_one_document_at_end() {
        let mut reporter = JsonReporter::new(Vec::new());
        let group = GroupContext::new("f.yml check", 0);
        reporter.report_group(&group).expect("group");
        reporter
            .report_check(&group, "format", &CheckResult::Pass)
            .expect("check");
        reporter
            .report_check(&group, "service", &CheckResult::fail("need service config"))
            .expect("check");
        reporter
            .report_check(&group, "package in/exclude type", &CheckResult::Skip)
            .expect("check");
        reporter.report_end().expect("end");

        let output = String::from_utf8(reporter.into_inner()).expect("utf8");
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("parse");
        assert_eq!(parsed["allPassed"], false);
        assert_eq!(parsed["groups"][0]["name"], "f.yml check");
        assert_eq!(parsed["groups"][0]["checks"][1]["result"]["status"], "fail");
        assert_eq!(parsed["groups"][0]["checks"][2]["result"]["status"], "skip");
        assert_eq!(parsed["errors"][0]["message"], "need service config");
        assert_eq!(parsed["errors"][0]["group"], "f.yml check");
    }

    #[test]
    fn nothing_is_written_before_end() {
        let mut reporter = JsonReporter::new(Vec::new());
        let group = GroupContext::new("g", 0);
        reporter.report_group(&group).expect("group");
        reporter
            .report_check(&group, "t", &CheckResult::Pass)
            .expect("check");

        assert_eq!(reporter.report().groups[0].checks.len(), 1);
        assert!(reporter.into_inner().is_empty());
    }

    #[test]
    fn start_discards_the_previous_report() {
        let mut reporter = JsonReporter::new(Vec::new());
        let group = GroupContext::new("mixed", 0);
        for _ in 0..2 {
            reporter.report_start().expect("start");
            reporter.report_group(&group).expect("group");
            reporter
                .report_check(&group, "fail", &CheckResult::fail("need X"))
                .expect("check");
            reporter.report_end().expect("end");
        }

        assert_eq!(reporter.report().groups.len(), 1);
        assert_eq!(reporter.report().groups[0].checks.len(), 1);
        assert_eq!(reporter.report().errors.len(), 1);
    }

    #[test]
    fn empty_run_passes() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report_end().expect("end");

        assert!(reporter.report().all_passed);
        assert!(reporter.report().groups.is_empty());
    }

    #[test]
    fn renders_json_payload() {
        let json = render_json(&vec![CheckResult::Pass]).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert!(parsed.is_array());
        assert_eq!(parsed[0]["status"], "pass");
    }
}
