// paceline CLI - find an athlete across providers and reconcile their results

mod exit_codes;
mod reconcile;
mod report;
mod search;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use paceline_recon::{ReconError, Selection};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "paceline")]
#[command(about = "Reconcile an athlete's results across track & field data providers")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every provider for an athlete
    #[command(after_help = "\
Examples:
  paceline search 'ana ruiz' --fixtures dumps/athletic_net --fixtures dumps/milesplit
  paceline search ruiz --fixtures dumps/milesplit --json")]
    Search {
        /// Free-text athlete query
        query: String,

        /// Provider dump directory (repeatable, registration order)
        #[arg(long = "fixtures", value_name = "DIR", required = true)]
        fixtures: Vec<PathBuf>,

        /// Config file (default: <config dir>/paceline/paceline.toml if present)
        #[arg(long, env = "PACELINE_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Merge one athlete's records from several providers
    #[command(after_help = "\
Examples:
  paceline reconcile --select 19161256@athletic_net --select 8841@milesplit \\
      --fixtures dumps/athletic_net --fixtures dumps/milesplit
  paceline reconcile --query 'ana ruiz' --fixtures dumps/athletic_net --fixtures dumps/milesplit --json
  paceline reconcile --query 'ana ruiz' --fixtures dumps/milesplit --best-effort --output ana.json")]
    Reconcile {
        /// Athlete to include, as EXTERNAL_ID@PROVIDER (repeatable)
        #[arg(
            long = "select",
            value_name = "ID@PROVIDER",
            value_parser = parse_selection,
            required_unless_present = "query",
            conflicts_with = "query"
        )]
        select: Vec<Selection>,

        /// Reconcile each provider's top search hit instead
        #[arg(long)]
        query: Option<String>,

        /// Provider dump directory (repeatable, registration order)
        #[arg(long = "fixtures", value_name = "DIR", required = true)]
        fixtures: Vec<PathBuf>,

        /// Config file (default: <config dir>/paceline/paceline.toml if present)
        #[arg(long, env = "PACELINE_CONFIG")]
        config: Option<PathBuf>,

        /// Drop failed loads and report them as warnings
        #[arg(long)]
        best_effort: bool,

        /// Output JSON to stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  paceline validate paceline.toml
  paceline validate paceline.toml --fixtures dumps/athletic_net --fixtures dumps/milesplit")]
    Validate {
        /// Path to the config file
        config: PathBuf,

        /// Also check provider sections against these dump directories
        #[arg(long = "fixtures", value_name = "DIR")]
        fixtures: Vec<PathBuf>,
    },
}

fn parse_selection(s: &str) -> Result<Selection, String> {
    match s.rsplit_once('@') {
        Some((id, provider)) if !id.is_empty() && !provider.is_empty() => {
            Ok(Selection::new(id, provider))
        }
        _ => Err(format!("expected EXTERNAL_ID@PROVIDER, got \"{s}\"")),
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  paceline-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Search { query, fixtures, config, json } => {
            search::cmd_search(query, fixtures, config, json)
        }
        Commands::Reconcile { select, query, fixtures, config, best_effort, json, output } => {
            reconcile::cmd_reconcile(reconcile::ReconcileArgs {
                select,
                query,
                fixtures,
                config,
                best_effort,
                json,
                output,
            })
        }
        Commands::Validate { config, fixtures } => settings::cmd_validate(config, fixtures),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Failure that is neither the caller's input nor an engine error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its registered exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::UnknownProvider(_) => {
                Some("pass a --fixtures directory whose provider.toml has that id".to_string())
            }
            ReconError::NoSearchResults(_) => {
                Some("try fewer words, or select athletes with --select ID@PROVIDER".to_string())
            }
            ReconError::Fetch { .. } => Some("rerun with --best-effort to skip failing sources".to_string()),
            ReconError::Io(_) => Some("each --fixtures directory needs a provider.toml".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self::recon(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_splits_on_last_at() {
        let s = parse_selection("19161256@athletic_net").unwrap();
        assert_eq!(s, Selection::new("19161256", "athletic_net"));
        let s = parse_selection("ana@ruiz@milesplit").unwrap();
        assert_eq!(s.external_id, "ana@ruiz");
        assert_eq!(s.provider, "milesplit");
    }

    #[test]
    fn selection_needs_both_parts() {
        assert!(parse_selection("19161256").is_err());
        assert!(parse_selection("@milesplit").is_err());
        assert!(parse_selection("42@").is_err());
    }

    #[test]
    fn error_constructors_pick_exit_codes() {
        assert_eq!(CliError::usage("bad flag").code, EXIT_USAGE);
        assert_eq!(CliError::internal("serializer").code, EXIT_ERROR);
        let err = CliError::from(ReconError::UnknownProvider("runnerspace".into()));
        assert_eq!(err.code, exit_codes::EXIT_UNKNOWN_PROVIDER);
        assert!(err.hint.is_some());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
