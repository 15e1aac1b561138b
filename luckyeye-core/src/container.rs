//! Rule orchestration.

use log::debug;

use crate::error::{LuckyeyeError, Result};
use crate::reporter::{GroupContext, Reporter, SilentReporter};
use crate::result::{CheckResult, RunSummary};
use crate::rule::Rule;
use crate::runner::Runner;

/// Runs registered rules in order and drives a single reporter.
pub struct RunnerContainer {
    rules: Vec<Box<dyn Rule>>,
    reporter: Box<dyn Reporter>,
}

impl Default for RunnerContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerContainer {
    /// Create a container with no rules and a silent reporter.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            reporter: Box::new(SilentReporter),
        }
    }

    /// Register a rule. Rules run in registration order; duplicates run twice.
    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        self.add_boxed_rule(Box::new(rule))
    }

    /// Register an already boxed rule.
    pub fn add_boxed_rule(&mut self, rule: Box<dyn Rule>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Install the reporter, replacing any previous one.
    pub fn register_report<R: Reporter + 'static>(&mut self, reporter: R) -> &mut Self {
        self.register_boxed_report(Box::new(reporter))
    }

    /// Install an already boxed reporter, replacing any previous one.
    pub fn register_boxed_report(&mut self, reporter: Box<dyn Reporter>) -> &mut Self {
        self.reporter = reporter;
        self
    }

    /// Hook for discovering externally packaged rules.
    ///
    /// No package format exists yet, so this only logs.
    pub fn load_rule_package(&mut self) -> Result<()> {
        debug!("no external rule packages to load");
        Ok(())
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Execute every rule's checks one at a time and report each outcome.
    ///
    /// Any error from a rule or check aborts the run before `report_end`.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        self.reporter.report_start()?;

        for (rule_index, rule) in self.rules.iter().enumerate() {
            let mut runner = Runner::new();
            rule.apply(&mut runner)?;
            let groups = runner.into_groups()?;
            debug!("rule {rule_index} produced {} group(s)", groups.len());

            for group in groups {
                let (name, checks) = group.into_parts();
                let context = GroupContext::new(name, summary.groups);
                summary.groups += 1;
                self.reporter.report_group(&context)?;

                for check in checks {
                    let title = check.title().to_string();
                    let result = check.evaluate().await?;
                    if matches!(&result, CheckResult::Fail(message) if message.trim().is_empty()) {
                        return Err(LuckyeyeError::EmptyFailure {
                            group: context.name.clone(),
                            title,
                        });
                    }
                    summary.record(&result);
                    self.reporter.report_check(&context, &title, &result)?;
                    if result.is_skip() {
                        self.reporter.report_skip(&context, &title)?;
                    }
                }
            }
        }

        self.reporter.report_end()?;
        debug!(
            "run finished: {} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::RunnerContainer;
    use crate::error::{LuckyeyeError, Result};
    use crate::reporter::{GroupContext, Reporter};
    use crate::result::CheckResult;
    use crate::runner::Runner;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct EventLog(Arc<Mutex<Vec<String>>>);

    impl EventLog {
        fn events(&self) -> Vec<String> {
            self.0.lock().expect("event log").clone()
        }

        fn push(&self, event: String) {
            self.0.lock().expect("event log").push(event);
        }
    }

    struct LogReporter(EventLog);

    impl Reporter for LogReporter {
        fn report_start(&mut self) -> Result<()> {
            self.0.push("start".to_string());
            Ok(())
        }

        fn report_group(&mut self, group: &GroupContext) -> Result<()> {
            self.0.push(format!("group {} #{}", group.name, group.index));
            Ok(())
        }

        fn report_check(
            &mut self,
            group: &GroupContext,
            title: &str,
            result: &CheckResult,
        ) -> Result<()> {
            let outcome = match result {
                CheckResult::Pass => "pass".to_string(),
                CheckResult::Fail(message) => format!("fail: {message}"),
                CheckResult::Skip => "skip".to_string(),
            };
            self.0.push(format!("check {}/{title} {outcome}", group.name));
            Ok(())
        }

        fn report_skip(&mut self, group: &GroupContext, title: &str) -> Result<()> {
            self.0.push(format!("skip {}/{title}", group.name));
            Ok(())
        }

        fn report_end(&mut self) -> Result<()> {
            self.0.push("end".to_string());
            Ok(())
        }
    }

    fn mixed_rule(runner: &mut Runner) -> Result<()> {
        runner
            .group("mixed")
            .check("pass", || CheckResult::Pass)
            .check("fail", || CheckResult::fail("need X"))
            .check("skip", || CheckResult::Skip);
        Ok(())
    }

    #[tokio::test]
    async fn run_emits_events_in_order() {
        let log = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(log.clone()));
        container.add_rule(mixed_rule);

        let summary = container.run().await.expect("run");

        assert_eq!(
            log.events(),
            vec![
                "start",
                "group mixed #0",
                "check mixed/pass pass",
                "check mixed/fail fail: need X",
                "check mixed/skip skip",
                "skip mixed/skip",
                "end",
            ]
        );
        assert_eq!(summary.groups, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn multiple_groups_from_one_rule_are_indexed() {
        let log = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(log.clone()));
        container.add_rule(|runner: &mut Runner| -> Result<()> {
            runner.group("first").check("a", || CheckResult::Pass);
            runner.group("second").check("b", || CheckResult::Pass);
            Ok(())
        });
        container.add_rule(mixed_rule);

        let summary = container.run().await.expect("run");

        let groups: Vec<String> = log
            .events()
            .into_iter()
            .filter(|event| event.starts_with("group"))
            .collect();
        assert_eq!(groups, vec!["group first #0", "group second #1", "group mixed #2"]);
        assert_eq!(summary.groups, 3);
    }

    #[tokio::test]
    async fn duplicate_rules_run_twice() {
        let log = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(log.clone()));
        container.add_rule(mixed_rule).add_rule(mixed_rule);

        let summary = container.run().await.expect("run");

        assert_eq!(container.rule_count(), 2);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn last_registered_reporter_wins() {
        let replaced = EventLog::default();
        let active = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(replaced.clone()));
        container.register_report(LogReporter(active.clone()));

        container.run().await.expect("run");

        assert!(replaced.events().is_empty());
        assert_eq!(active.events(), vec!["start", "end"]);
    }

    #[tokio::test]
    async fn empty_failure_message_aborts() {
        let log = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(log.clone()));
        container.add_rule(|runner: &mut Runner| -> Result<()> {
            runner.group("quiet").check("mute", || CheckResult::fail("  "));
            Ok(())
        });

        match container.run().await {
            Err(LuckyeyeError::EmptyFailure { group, title }) => {
                assert_eq!(group, "quiet");
                assert_eq!(title, "mute");
            }
            other => panic!("expected empty failure, got {other:?}"),
        }
        assert!(!log.events().contains(&"end".to_string()));
    }

    #[tokio::test]
    async fn rule_errors_abort_before_any_group() {
        let log = EventLog::default();
        let mut container = RunnerContainer::new();
        container.register_report(LogReporter(log.clone()));
        container.add_rule(|_runner: &mut Runner| -> Result<()> {
            Err(LuckyeyeError::Other("rule exploded".to_string()))
        });

        assert!(container.run().await.is_err());
        assert_eq!(log.events(), vec!["start"]);
    }

    #[tokio::test]
    async fn orphan_checks_abort_the_run() {
        let mut container = RunnerContainer::new();
        container.add_rule(|runner: &mut Runner| -> Result<()> {
            runner.check("orphan", || CheckResult::Pass);
            Ok(())
        });

        assert!(matches!(
            container.run().await,
            Err(LuckyeyeError::CheckOutsideGroup { .. })
        ));
    }

    #[tokio::test]
    async fn runs_without_a_registered_reporter() {
        let mut container = RunnerContainer::new();
        container.load_rule_package().expect("load packages");
        container.add_rule(mixed_rule);

        let summary = container.run().await.expect("run");
        assert_eq!(summary.failed, 1);
    }
}
