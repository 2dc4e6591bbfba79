//! agent-lint: validate (and optionally fix) agent frontmatter.
//!
//! Exit codes: 0 clean (or `--warn-only`), 1 violations, 2 usage/internal
//! error, 130 interrupted.
//!
//! Logging: set `RUST_LOG=omni_lint=debug` (or pass `--verbose`) to see
//! per-file logs on stderr.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use omni_lint::{
    ExitStatus, LintError, LintOptions, LintSettings, ScanOptions, SchemaKind, SchemaRegistry,
    SchemaSelection, Scanner, missing_root_warning, render_tool_list,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "agent-lint",
    version,
    about = "Lint agent markdown files (OpenCode and Claude frontmatter schemas)"
)]
struct Cli {
    /// Root directories to scan.
    #[arg(long, value_name = "DIR", num_args = 1.., default_values = ["opencode"])]
    roots: Vec<PathBuf>,

    /// Flag missing model as violation.
    #[arg(long)]
    require_model: bool,

    /// Insert model into agents missing it.
    #[arg(long, value_name = "MODEL")]
    fix_missing_model: Option<String>,

    /// Auto-fix non-canonical key order (OpenCode).
    #[arg(long)]
    check_order: bool,

    /// Exit 0 even if violations found.
    #[arg(long)]
    warn_only: bool,

    /// Print allowed tools and exit.
    #[arg(long)]
    list_tools: bool,

    /// Schema selection strategy.
    #[arg(long, value_enum, default_value_t = SchemaArg::Auto)]
    schema: SchemaArg,

    /// Allow deprecated keys in Claude schema without warning.
    #[arg(long)]
    allow_deprecated_claude: bool,

    /// Rule-table overrides (YAML, or TOML by extension).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Debug logging on stderr.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemaArg {
    Auto,
    Opencode,
    Claude,
}

impl From<SchemaArg> for SchemaSelection {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Auto => Self::Auto,
            SchemaArg::Opencode => Self::Forced(SchemaKind::OpenCode),
            SchemaArg::Claude => Self::Forced(SchemaKind::Claude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            roots: self.roots.clone(),
            selection: self.schema.into(),
            lint: LintOptions {
                require_model: self.require_model,
                fix_missing_model: self.fix_missing_model.clone(),
                fix_order: self.check_order,
                allow_deprecated_claude: self.allow_deprecated_claude,
            },
        }
    }
}

fn load_registry(cli: &Cli) -> Result<SchemaRegistry> {
    match &cli.config_file {
        Some(path) => {
            let settings = LintSettings::load(path)
                .with_context(|| format!("loading lint settings from {}", path.display()))?;
            Ok(settings.registry())
        }
        None => Ok(SchemaRegistry::default()),
    }
}

fn try_execute(cli: &Cli) -> Result<ExitStatus> {
    let registry = load_registry(cli)?;

    if cli.list_tools {
        print!("{}", render_tool_list(&registry));
        return Ok(ExitStatus::Clean);
    }

    // Printed when found: a scan with no existing root fails before any report.
    let output = cli.output;
    let report = Scanner::new(&registry).run_with(&cli.scan_options(), |root| {
        let warning = missing_root_warning(root);
        match output {
            OutputFormat::Text => println!("{warning}"),
            OutputFormat::Json => eprintln!("{warning}"),
        }
    })?;
    match cli.output {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(report.exit_status(cli.warn_only))
}

fn execute(cli: &Cli) -> ExitStatus {
    match try_execute(cli) {
        Ok(status) => status,
        Err(error) => {
            match error.downcast_ref::<LintError>() {
                Some(lint_error) if lint_error.is_usage() => eprintln!("{lint_error}"),
                _ => eprintln!("Internal error: {error:#}"),
            }
            ExitStatus::Error
        }
    }
}

/// Run the blocking scan on a worker thread so Ctrl-C can be reported
/// with its own exit code.
async fn supervise(cli: Cli) -> ExitStatus {
    let scan = tokio::task::spawn_blocking(move || execute(&cli));
    tokio::select! {
        joined = scan => match joined {
            Ok(status) => status,
            Err(error) => {
                eprintln!("Internal error: {error}");
                ExitStatus::Error
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            ExitStatus::Interrupted
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else warnings only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_lint=debug,agent_lint=debug"
        } else {
            "omni_lint=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Internal error: {error}");
            return ExitStatus::Error.into();
        }
    };
    let status = runtime.block_on(supervise(cli));
    // Do not wait for an interrupted scan thread.
    runtime.shutdown_background();
    status.into()
}
