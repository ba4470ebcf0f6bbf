//! Subcommand handlers
//!
//! Results go to stdout as pretty JSON; logs go to stderr. Handlers return
//! `false` when the command ran but did not succeed (rejected input or an
//! exhausted request), which becomes exit status 1.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uigen_backend::GeminiBackend;
use uigen_core::{GenerationError, GenerationResult, JsonlHistory, Orchestrator, UigenConfig};
use uigen_schema::{schema_for, ArtifactKind, Provider};
use uigen_validate::{SyntaxValidator, ValidationOutcome, ValidatorSet};

const DEFAULT_CONFIG_FILE: &str = "uigen.toml";

pub(crate) async fn dispatch(name: &str, args: &ArgMatches) -> Result<bool> {
    match name {
        "kinds" => Ok(kinds()),
        "describe" => describe(args),
        "validate" => validate(args),
        "check" => check(args),
        "config" => {
            let orchestrator = orchestrator(args)?;
            let kind = required(args, "kind")?;
            let intent = required(args, "intent")?;
            let current = read_json(args.get_one::<PathBuf>("current"))?;
            let result = orchestrator.generate_config(kind, intent, &current).await;
            finish(&orchestrator, result).await
        }
        "code" => {
            let orchestrator = orchestrator(args)?;
            let intent = required(args, "intent")?;
            let providers: Vec<&str> = args
                .get_many::<String>("provider")
                .map(|values| values.map(String::as_str).collect())
                .unwrap_or_default();
            let current = read_json(args.get_one::<PathBuf>("current"))?;
            let result = orchestrator.generate_code(intent, &current, &providers).await;
            finish(&orchestrator, result).await
        }
        "component" => {
            let orchestrator = orchestrator(args)?;
            let intent = required(args, "intent")?;
            let current = match args.get_one::<PathBuf>("current") {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => String::new(),
            };
            let result = orchestrator.generate_component(intent, &current).await;
            finish(&orchestrator, result).await
        }
        "history" => history(args).await,
        other => bail!("unknown command: {other}"),
    }
}

/// Print the result once queued history writes have landed
async fn finish(orchestrator: &Orchestrator, result: Result<GenerationResult, GenerationError>) -> Result<bool> {
    orchestrator.flush_history().await;
    Ok(report(&result?))
}

fn kinds() -> bool {
    for kind in ArtifactKind::ALL {
        match schema_for(kind) {
            Ok(schema) => println!("{:<12} config {}", kind.tag(), schema.summary()),
            Err(_) => println!("{:<12} code   {}", kind.tag(), kind.display_name()),
        }
    }
    true
}

fn describe(args: &ArgMatches) -> Result<bool> {
    let kind: ArtifactKind = required(args, "kind")?.parse()?;
    let schema = schema_for(kind)?;
    if args.get_flag("example") {
        println!("{}", serde_json::to_string_pretty(schema.example())?);
    } else {
        print!("{}", schema.describe());
    }
    Ok(true)
}

fn validate(args: &ArgMatches) -> Result<bool> {
    let kind: ArtifactKind = required(args, "kind")?.parse()?;
    let validators = ValidatorSet::builtin();
    let validator = validators.get(kind)?;
    let input = read_input(args.get_one::<PathBuf>("file"))?;
    let value: Value = serde_json::from_str(&input).context("input is not valid JSON")?;
    Ok(print_outcome(&validator.validate(&value)))
}

fn check(args: &ArgMatches) -> Result<bool> {
    let source = read_input(args.get_one::<PathBuf>("file"))?;
    let syntax = SyntaxValidator::new();
    let outcome = match args.get_one::<String>("provider") {
        Some(id) => syntax.check_provider(id.parse::<Provider>()?, &source),
        None => syntax.check_compiles(&source),
    };
    Ok(print_outcome(&outcome))
}

async fn history(args: &ArgMatches) -> Result<bool> {
    let config = load_config(args)?;
    let Some(path) = config.history.path else {
        bail!("no history file configured; set [history] path in {DEFAULT_CONFIG_FILE}");
    };
    let limit = args.get_one::<usize>("limit").copied().unwrap_or(20);

    let store = JsonlHistory::new(path);
    let records = store.load().await?;
    tracing::debug!(path = %store.path().display(), records = records.len(), "history loaded");
    let start = records.len().saturating_sub(limit);
    for record in &records[start..] {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(true)
}

fn orchestrator(args: &ArgMatches) -> Result<Orchestrator> {
    let config = load_config(args)?;
    let backend = GeminiBackend::from_env(&config.backend).context("failed to create generation backend")?;
    tracing::debug!(model = backend.model(), "backend ready");

    let mut orchestrator = Orchestrator::new(Arc::new(backend)).with_config(config.generation);
    if let Some(path) = config.history.path {
        orchestrator = orchestrator.with_history(Arc::new(JsonlHistory::new(path)));
    }
    tracing::debug!(max_attempts = orchestrator.config().max_attempts, "orchestrator ready");
    Ok(orchestrator)
}

fn load_config(args: &ArgMatches) -> Result<UigenConfig> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => UigenConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => UigenConfig::load(DEFAULT_CONFIG_FILE)?,
        None => UigenConfig::default(),
    };
    let config = config.with_env_overrides()?;
    Ok(match args.get_one::<u32>("max-attempts") {
        Some(max_attempts) => {
            let generation = config.generation.with_max_attempts(*max_attempts);
            config.with_generation(generation)
        }
        None => config,
    })
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn read_json(path: Option<&PathBuf>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_outcome(outcome: &ValidationOutcome) -> bool {
    match serde_json::to_string_pretty(outcome) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "failed to render outcome"),
    }
    outcome.is_accepted()
}

fn report(result: &GenerationResult) -> bool {
    let rendered = render(result);
    println!("{}", serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| rendered.to_string()));
    result.is_success()
}

fn render(result: &GenerationResult) -> Value {
    match result {
        GenerationResult::Success { value, attempts_used } => json!({
            "status": "success",
            "attempts_used": attempts_used,
            "value": value,
        }),
        GenerationResult::Exhausted { last_error, attempts_used } => json!({
            "status": "exhausted",
            "attempts_used": attempts_used,
            "last_error": last_error.to_string(),
            "feedback": last_error.feedback_lines(),
        }),
    }
}
