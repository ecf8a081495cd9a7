//! `paceline reconcile`: merged athlete profile from explicit selections or
//! a query.

use std::path::PathBuf;

use paceline_recon::{LoadPolicy, Reconciler, Selection};

use crate::report::render_athlete;
use crate::settings::{load_config, open_sources};
use crate::CliError;

pub struct ReconcileArgs {
    pub select: Vec<Selection>,
    pub query: Option<String>,
    pub fixtures: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub best_effort: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn cmd_reconcile(args: ReconcileArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if args.best_effort {
        config.load_policy = LoadPolicy::BestEffort;
    }
    let registry = open_sources(&args.fixtures, &config)?;
    let engine = Reconciler::new(registry).with_config(config);

    let athlete = match &args.query {
        Some(query) => smol::block_on(engine.reconcile_by_query(query))?,
        None => smol::block_on(engine.reconcile(&args.select))?,
    };

    for warning in &athlete.warnings {
        match &warning.external_id {
            Some(id) => eprintln!("warning: {id}@{}: {}", warning.provider, warning.message),
            None => eprintln!("warning: {}: {}", warning.provider, warning.message),
        }
    }

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&athlete)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::usage(format!("cannot write output {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }
        if args.json {
            println!("{json_str}");
        }
    }

    if !args.json {
        print!("{}", render_athlete(&athlete));
    }
    Ok(())
}
