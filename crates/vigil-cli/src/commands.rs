use std::path::{Path, PathBuf};

use eyre::WrapErr;
use vigil_core::models::response::Responses;
use vigil_core::models::schema::{InstrumentKind, Questionnaire};
use vigil_export::lookup::{audit_lookup, Lookup, MissingLookup};
use vigil_export::render::render_report;

use crate::cli::{CheckArgs, ConfigCommand, OutputFormat, ScoreArgs};
use crate::config::{self, VigilConfig};

pub fn score(args: &ScoreArgs, config: &VigilConfig) -> eyre::Result<String> {
    let schema = load_schema(&args.schema)?;
    let raw = read_json(&args.responses)?;
    let responses = Responses::from_value(&raw)
        .wrap_err_with(|| format!("invalid responses in {}", args.responses.display()))?;

    if let Some(path) = args.lookup.as_ref().or(config.lookup_path.as_ref()) {
        audit_lookup(&schema, &load_lookup(path)?);
    }

    let evaluation = vigil_instruments::evaluate(&schema, &responses);
    tracing::info!(
        categories = evaluation.categories.len(),
        answers = responses.len(),
        "evaluation complete"
    );

    match args.format.unwrap_or(config.default_format) {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&evaluation)? + "\n"),
        OutputFormat::Text => {
            let template = match args.template.as_ref().or(config.template_path.as_ref()) {
                Some(path) => Some(
                    std::fs::read_to_string(path)
                        .wrap_err_with(|| format!("failed to read template {}", path.display()))?,
                ),
                None => None,
            };
            Ok(render_report(&evaluation, template.as_deref())?)
        }
    }
}

pub fn check(args: &CheckArgs, config: &VigilConfig) -> eyre::Result<String> {
    let schema = load_schema(&args.schema)?;
    let mut out = String::new();
    let mut problems = 0;

    for instrument in schema.instruments() {
        if let Some(reason) = &instrument.defect {
            out.push_str(&format!("unreadable instrument '{}': {reason}\n", instrument.id));
            problems += 1;
        } else if let InstrumentKind::Unsupported(tag) = &instrument.kind {
            out.push_str(&format!(
                "unsupported instrument '{}': type '{tag}'\n",
                instrument.id
            ));
            problems += 1;
        }
    }

    if let Some(path) = args.lookup.as_ref().or(config.lookup_path.as_ref()) {
        let missing = audit_lookup(&schema, &load_lookup(path)?);
        for MissingLookup {
            instrument_id,
            item_key,
            lookup_key,
        } in &missing
        {
            out.push_str(&format!(
                "missing helper text '{lookup_key}' for {instrument_id}.{item_key}\n"
            ));
        }
        problems += missing.len();
    }

    let instruments = schema.instruments().count();
    out.push_str(&format!(
        "{} categories, {instruments} instruments, {problems} problem(s)\n",
        schema.categories.len()
    ));
    Ok(out)
}

pub fn config(command: &ConfigCommand, path: Option<&Path>) -> eyre::Result<String> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path()?,
    };
    match command {
        ConfigCommand::Path => Ok(format!("{}\n", path.display())),
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(eyre::eyre!(
                    "config already exists at {} (use --force to replace it)",
                    path.display()
                ));
            }
            config::save_config_to(&path, &VigilConfig::default())?;
            Ok(format!("wrote {}\n", path.display()))
        }
    }
}

fn load_schema(path: &Path) -> eyre::Result<Questionnaire> {
    let raw = read_json(path)?;
    Questionnaire::from_value(&raw).wrap_err_with(|| format!("invalid schema in {}", path.display()))
}

fn load_lookup(path: &Path) -> eyre::Result<Lookup> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read lookup {}", path.display()))?;
    Lookup::from_json_str(&contents).wrap_err_with(|| format!("invalid lookup in {}", path.display()))
}

fn read_json(path: &Path) -> eyre::Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("{} is not valid JSON", path.display()))
}
