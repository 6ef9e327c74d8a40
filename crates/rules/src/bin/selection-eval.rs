//! selection-eval: run the selection engine over request JSON.
//!
//! Reads one request object or an array of requests from a file or stdin,
//! resolves the selection config (request's own, then the user's stored
//! config, then the default) and prints the analysis as JSON.
//!
//! With `--validate <file>` it validates a selection config instead.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn};

use selection_core::config::{load_dotenv, Settings};
use selection_rules::loader::{ConfigStore, LoadStatus};
use selection_rules::pipeline::{analyze_batch, analyze_request, AnalysisRequest};
use selection_rules::schema::SelectionConfig;
use selection_rules::validation::{validate_json, validate_yaml};

// ── CLI ─────────────────────────────────────────────────────────────

/// Product selection engine: channel breakdown, findings and verdict.
#[derive(Parser, Debug)]
#[command(name = "selection-eval", version, about)]
struct Cli {
    /// Request JSON file (object or array). Reads stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// User whose stored config applies to requests without their own.
    #[arg(long, env = "SELECTION_USER")]
    user: Option<String>,

    /// Directory of per-user configs (overrides SELECTION_CONFIG_DIR).
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Default config file (overrides SELECTION_DEFAULT_CONFIG).
    #[arg(long)]
    default_config: Option<PathBuf>,

    /// Validate a selection config file (YAML or JSON) and exit.
    #[arg(long, conflicts_with = "input")]
    validate: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();

    if let Some(path) = &cli.validate {
        return run_validate(path, cli.pretty);
    }

    let mut settings = Settings::from_env();
    if let Some(dir) = cli.config_dir.clone() {
        settings.selection.config_dir = dir;
    }
    if let Some(path) = cli.default_config.clone() {
        settings.selection.default_config_path = Some(path);
    }
    settings.log_summary();

    let store = ConfigStore::from_settings(&settings.selection)
        .context("failed to load default selection config")?;
    for result in store.load_all()? {
        if let LoadStatus::Failed { error } = &result.status {
            warn!(path = %result.path.display(), error = %error, "skipped user config");
        }
    }
    info!(
        path = %store.config_dir().display(),
        users = store.users().len(),
        "user selection configs ready"
    );
    let fallback = store.resolve(cli.user.as_deref());

    let input = read_input(cli.input.as_deref())?;
    let default_days = settings.selection.default_days;

    let output = match input {
        Value::Array(items) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.batch.threads)
                .build()
                .context("failed to build batch thread pool")?;
            info!(requests = items.len(), threads = pool.current_num_threads(), "running batch analysis");
            pool.install(|| run_batch(items, default_days, &fallback))
        }
        single => {
            let request = AnalysisRequest::parse(with_default_days(single, default_days))
                .context("invalid analysis request")?;
            let response = analyze_request(&request, &fallback)?;
            serde_json::to_value(response)?
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

/// Evaluate every request; failures become `{ "error": ... }` entries in place.
fn run_batch(items: Vec<Value>, default_days: u32, fallback: &SelectionConfig) -> Value {
    let parsed: Vec<_> = items
        .into_iter()
        .map(|item| AnalysisRequest::parse(with_default_days(item, default_days)))
        .collect();

    let requests: Vec<AnalysisRequest> = parsed
        .iter()
        .filter_map(|p| p.as_ref().ok().cloned())
        .collect();
    let mut responses = analyze_batch(&requests, fallback).into_iter();

    let out = parsed
        .into_iter()
        .map(|p| {
            let result = match p {
                Ok(_) => responses
                    .next()
                    .map(|r| r.map_err(|e| e.to_string()))
                    .unwrap_or_else(|| Err("missing batch result".to_string())),
                Err(e) => Err(e.to_string()),
            };
            match result {
                Ok(response) => serde_json::to_value(response).unwrap_or_else(|e| json!({ "error": e.to_string() })),
                Err(error) => json!({ "error": error }),
            }
        })
        .collect();
    Value::Array(out)
}

fn with_default_days(mut value: Value, default_days: u32) -> Value {
    if let Some(obj) = value.as_object_mut() {
        obj.entry("days").or_insert_with(|| json!(default_days));
    }
    value
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("input is not valid JSON")
}

fn run_validate(path: &Path, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let result = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => validate_json(&raw),
        _ => validate_yaml(&raw),
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    if !result.valid {
        bail!("{} has {} error(s)", path.display(), result.errors.len());
    }
    Ok(())
}
