#![deny(missing_docs)]
//! Luckyeye command-line interface.
//!
//! Detects the project type in a directory and runs the matching rule set.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use luckyeye_core::{
    ConsoleReporter, JsonReporter, Project, ProjectChecker, ProjectType, Reporter, RunSummary,
    StdFileSystem, render_json,
};
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "luckyeye", version, about = "Luckyeye project checker")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct ProjectArgs {
    /// Project directory to inspect (defaults to the current directory).
    #[arg(long, env = "LUCKYEYE_CWD")]
    cwd: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, env = "LUCKYEYE_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug)]
struct CheckArgs {
    #[command(flatten)]
    project: ProjectArgs,
    #[command(flatten)]
    output: OutputArgs,
    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,
    /// Abort the run after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args, Clone, Debug)]
struct DetectArgs {
    #[command(flatten)]
    project: ProjectArgs,
    /// Output format for the detection result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every rule that applies to the project.
    Check(CheckArgs),
    /// Print the detected project type.
    Detect(DetectArgs),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectReport {
    root: PathBuf,
    project_type: ProjectType,
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check(args) => {
            let summary = run_check(args).await?;
            Ok(exit_code(&summary))
        }
        Commands::Detect(args) => {
            print!("{}", run_detect(args)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
fn main() {}

#[cfg_attr(test, allow(dead_code))]
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[cfg_attr(test, allow(dead_code))]
fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn resolve_root(args: &ProjectArgs) -> CliResult<PathBuf> {
    match &args.cwd {
        Some(path) => Ok(path.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

async fn run_check(args: CheckArgs) -> CliResult<RunSummary> {
    let root = resolve_root(&args.project)?;
    info!("checking {}", root.display());

    let out = open_output(args.output.report_output.as_deref()).await?;
    let color = use_color(&args);
    let reporter = build_reporter(args.output.format, out, color);
    let checker = ProjectChecker::new(StdFileSystem::new(), root);

    let summary = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), checker.check(reporter))
            .await
            .map_err(|_| format!("check timed out after {secs}s"))??,
        None => checker.check(reporter).await?,
    };
    debug!(
        "{} group(s), {} passed, {} failed, {} skipped",
        summary.groups, summary.passed, summary.failed, summary.skipped
    );
    Ok(summary)
}

fn run_detect(args: DetectArgs) -> CliResult<String> {
    let root = resolve_root(&args.project)?;
    let project = ProjectChecker::new(StdFileSystem::new(), root).detect()?;
    render_detect(&project, args.format)
}

fn render_detect(project: &Project, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(format!("{}\n", project.project_type)),
        OutputFormat::Json => {
            let report = DetectReport {
                root: project.root.clone(),
                project_type: project.project_type,
            };
            Ok(format!("{}\n", render_json(&report)?))
        }
    }
}

async fn open_output(path: Option<&Path>) -> CliResult<Box<dyn Write + Send>> {
    let Some(path) = path else {
        return Ok(Box::new(std::io::stdout()));
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let file = tokio::fs::File::create(path).await?.into_std().await;
    Ok(Box::new(std::io::BufWriter::new(file)))
}

fn use_color(args: &CheckArgs) -> bool {
    !args.no_color && args.output.report_output.is_none() && std::io::stdout().is_terminal()
}

fn build_reporter(
    format: OutputFormat,
    out: Box<dyn Write + Send>,
    color: bool,
) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleReporter::new(out).with_color(color)),
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CheckArgs, Cli, Commands, DetectArgs, OutputArgs, OutputFormat, ProjectArgs, render_detect,
        resolve_root, run_check, run_detect, use_color,
    };
    use clap::Parser;
    use luckyeye_core::{Project, ProjectType};
    use std::path::{Path, PathBuf};

    static UNIQUE_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let counter = UNIQUE_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        PathBuf::from(format!("luckyeye_cli_test_{nanos}_{counter}"))
    }

    fn temp_project(files: &[(&str, &str)]) -> PathBuf {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        for (name, contents) in files {
            std::fs::write(root.join(name), contents).expect("write file");
        }
        root
    }

    fn check_args(root: &Path, format: OutputFormat, report: &Path) -> CheckArgs {
        CheckArgs {
            project: ProjectArgs {
                cwd: Some(root.to_path_buf()),
            },
            output: OutputArgs {
                format,
                report_output: Some(report.to_path_buf()),
            },
            no_color: false,
            timeout: Some(30),
        }
    }

    const MANIFEST: &str = "service: demo\nprovider:\n  name: aliyun\n";
    const TSCONFIG: &str = r#"{ "compilerOptions": { "target": "es2017" } }"#;

    #[tokio::test]
    async fn check_writes_text_report_for_healthy_project() {
        let root = temp_project(&[("f.yml", MANIFEST), ("tsconfig.json", TSCONFIG)]);
        let report = root.join("out").join("report.txt");

        let summary = run_check(check_args(&root, OutputFormat::Text, &report))
            .await
            .expect("check");

        assert!(summary.is_success());
        assert_eq!(summary.groups, 2);
        let contents = std::fs::read_to_string(&report).expect("report");
        assert!(contents.contains("◎ f.yml check"));
        assert!(contents.contains(" ✔ compiler target"));
        assert!(contents.ends_with("All Check Passed\n"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn check_writes_json_failures() {
        let root = temp_project(&[("f.yml", "provider:\n  runtime: nodejs12\n")]);
        let report = root.join("report.json");

        let summary = run_check(check_args(&root, OutputFormat::Json, &report))
            .await
            .expect("check");

        assert_eq!(summary.failed, 3);
        let contents = std::fs::read_to_string(&report).expect("report");
        let parsed: serde_json::Value = serde_json::from_str(&contents).expect("json");
        assert_eq!(parsed["allPassed"], false);
        assert_eq!(parsed["errors"][0]["message"], "need service config");
        assert_eq!(parsed["errors"][1]["message"], "need provider name, e.g. aliyun");
        assert_eq!(parsed["errors"][2]["message"], "tsconfig.json not exists");

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn check_of_unknown_project_passes_with_no_groups() {
        let root = temp_project(&[("f.yml", "deployType: egg\n")]);
        let report = root.join("report.txt");

        let summary = run_check(check_args(&root, OutputFormat::Text, &report))
            .await
            .expect("check");

        assert_eq!(summary.groups, 0);
        assert!(summary.is_success());
        let contents = std::fs::read_to_string(&report).expect("report");
        assert_eq!(contents, "\nAll Check Passed\n");

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn detect_reports_project_type() {
        let root = temp_project(&[("f.yml", MANIFEST)]);
        let args = DetectArgs {
            project: ProjectArgs {
                cwd: Some(root.clone()),
            },
            format: OutputFormat::Text,
        };

        assert_eq!(run_detect(args).expect("detect"), "faas\n");

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn detect_json_includes_root() {
        let project = Project::new("/repo", ProjectType::Unknown);
        let rendered = render_detect(&project, OutputFormat::Json).expect("render");
        let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("json");

        assert_eq!(parsed["root"], "/repo");
        assert_eq!(parsed["projectType"], "unknown");
    }

    #[test]
    fn resolve_root_defaults_to_current_dir() {
        let root = resolve_root(&ProjectArgs { cwd: None }).expect("root");
        assert_eq!(root, std::env::current_dir().expect("cwd"));
    }

    #[test]
    fn file_reports_are_never_coloured() {
        let args = check_args(Path::new("/repo"), OutputFormat::Text, Path::new("/tmp/r.txt"));
        assert!(!use_color(&args));
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "luckyeye",
            "check",
            "--cwd",
            "/repo",
            "--format",
            "json",
            "--no-color",
            "--timeout",
            "5",
            "-v",
        ])
        .expect("parse");

        assert!(cli.verbose);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.project.cwd, Some(PathBuf::from("/repo")));
                assert_eq!(args.output.format, OutputFormat::Json);
                assert!(args.no_color);
                assert_eq!(args.timeout, Some(5));
            }
            Commands::Detect(_) => panic!("expected check command"),
        }
    }
}
