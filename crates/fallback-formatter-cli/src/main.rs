use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use fallback_formatter::{
    FallbackFormatter, FieldItems, FormatterConfigFile, RendererRegistry,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fallback-formatter")]
#[command(about = "Render field values through a fallback renderer chain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render items and print the composite output as JSON.
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["items", "item"])
    ))]
    Render {
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        #[arg(long, value_name = "ITEMS_JSON", group = "input")]
        items: Option<PathBuf>,
        #[arg(long, value_name = "VALUE", group = "input")]
        item: Vec<String>,
    },
    /// Print the settings summary.
    Summary {
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
    },
    /// Print the settings form as JSON.
    Form {
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
    },
    /// List registered renderers.
    Renderers {
        #[arg(long, value_name = "VALUE_TYPE")]
        value_type: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fallback_formatter=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Arc::new(RendererRegistry::with_builtins());

    match cli.command {
        Command::Render {
            config,
            items,
            item,
        } => {
            let formatter = load_formatter(&registry, &config)?;
            let items = match items {
                Some(path) => read_items(&path)?,
                None => FieldItems::from_values(item),
            };
            let output = formatter.view_field(&items);
            tracing::info!(
                rendered = output.len(),
                items = items.len(),
                "composed fallback output"
            );
            print_json(&serde_json::to_value(&output)?)
        }
        Command::Summary { config } => {
            let formatter = load_formatter(&registry, &config)?;
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", formatter.settings_summary())?;
            Ok(())
        }
        Command::Form { config } => {
            let formatter = load_formatter(&registry, &config)?;
            print_json(&serde_json::to_value(formatter.settings_form())?)
        }
        Command::Renderers { value_type } => {
            let descriptors: Vec<Value> = match value_type.as_deref() {
                Some(value_type) => registry
                    .list_applicable(value_type)
                    .into_iter()
                    .map(|descriptor| json!(descriptor))
                    .collect(),
                None => registry.descriptors().map(|descriptor| json!(descriptor)).collect(),
            };
            print_json(&Value::Array(descriptors))
        }
    }
}

fn load_formatter(registry: &Arc<RendererRegistry>, path: &Path) -> Result<FallbackFormatter> {
    let config = FormatterConfigFile::load(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    Ok(FallbackFormatter::new(
        Arc::clone(registry),
        config.value_type.clone(),
        config.settings(),
    )
    .with_context(config.context.clone()))
}

/// Accepts either a bare JSON array of values or a serialized `FieldItems`.
fn read_items(path: &Path) -> Result<FieldItems> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read items {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents).context("items file is not JSON")?;
    match value {
        Value::Array(values) => Ok(FieldItems::from_values(values)),
        other => serde_json::from_value(other).context("invalid items document"),
    }
}

fn print_json(value: &Value) -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
