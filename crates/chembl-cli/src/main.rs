//! ChEMBL CLI - run the ChEMBL transformers from the command line

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use chembl_core::config::Config;
use chembl_core::model::Element;
use chembl_core::query::ChemblQueries;
use chembl_core::storage::ChemblDatabases;
use chembl_core::transformer::{Property, TransformerQuery, TransformerRegistry};
use chembl_core::transformers::MOLECULE_PRODUCER;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chembl")]
#[command(author, version, about = "ChEMBL knowledge-graph transformers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List transformer definitions
    Transformers,

    /// Produce compounds from `;`-separated names, ChEMBL ids, or InChIKeys
    Produce {
        /// Query terms, e.g. "aspirin;CHEMBL:CHEMBL112"
        compounds: String,
    },

    /// Run a transformer over a JSON collection of elements
    Transform {
        /// Transformer name (see `chembl transformers`)
        name: String,
        /// JSON file holding the collection; `-` reads stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Extra control values as name=value
        #[arg(short, long = "control", value_parser = parse_control)]
        controls: Vec<Property>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn parse_control(s: &str) -> Result<Property, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    Ok(Property {
        name: name.trim().to_string(),
        value: value.to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chembl=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transformers => cmd_transformers(cli.pretty),
        Commands::Produce { compounds } => cmd_produce(&compounds, cli.pretty).await,
        Commands::Transform {
            name,
            input,
            controls,
        } => cmd_transform(&name, &input, controls, cli.pretty).await,
        Commands::Config { action } => cmd_config(action, cli.quiet),
        Commands::Doctor => cmd_doctor(cli.quiet).await,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

async fn open_registry() -> anyhow::Result<(ChemblDatabases, TransformerRegistry)> {
    let config = Config::load()?;
    let databases = ChemblDatabases::open(&config).await?;
    let queries: Arc<dyn ChemblQueries> = Arc::new(databases.queries());
    Ok((databases, TransformerRegistry::new(queries)))
}

/// Definitions only; no database is opened
fn cmd_transformers(pretty: bool) -> anyhow::Result<()> {
    print_json(&TransformerRegistry::definitions(), pretty)
}

async fn cmd_produce(compounds: &str, pretty: bool) -> anyhow::Result<()> {
    let (databases, registry) = open_registry().await?;
    let query = TransformerQuery::with_controls(&[("compounds", compounds)]);
    let elements = registry.transform(MOLECULE_PRODUCER, &query).await;
    databases.close().await;

    print_json(&elements.map_err(transformer_error)?, pretty)
}

async fn cmd_transform(
    name: &str,
    input: &str,
    controls: Vec<Property>,
    pretty: bool,
) -> anyhow::Result<()> {
    let collection = read_collection(input)?;
    info!(transformer = %name, elements = collection.len(), "Read input collection");

    let (databases, registry) = open_registry().await?;
    let query = TransformerQuery {
        controls,
        collection,
    };
    let elements = registry.transform(name, &query).await;
    databases.close().await;

    print_json(&elements.map_err(transformer_error)?, pretty)
}

/// Error code, message, and suggestion of a failed invocation
fn transformer_error(e: chembl_core::Error) -> anyhow::Error {
    let hint = e
        .suggestion()
        .map(|s| format!(" (try: {})", s))
        .unwrap_or_default();
    anyhow!("[{}] {}{}", e.code(), e, hint)
}

fn read_collection(input: &str) -> anyhow::Result<Vec<Element>> {
    let contents = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read collection from stdin")?;
        buffer
    } else {
        let path = PathBuf::from(input);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read collection: {}", path.display()))?
    };
    serde_json::from_str(&contents).context("Input is not a JSON array of elements")
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("ChEMBL Health Check");
        println!("===================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            return Err(e);
        }
    };

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }
    }

    match ChemblDatabases::open(&config).await {
        Ok(databases) => {
            for (label, db) in [("ChEMBL", databases.chembl()), ("Cross-reference", databases.xref())] {
                match db.health_check().await {
                    Ok(()) => {
                        if !quiet {
                            println!("[OK] {} database: Connected", label);
                            println!("     Path: {}", db.path().display());
                        }
                    }
                    Err(e) => {
                        all_ok = false;
                        warn!(database = %label, error = %e, "Health check failed");
                        if !quiet {
                            println!("[!!] {} database: Health check failed - {}", label, e);
                        }
                    }
                }
            }
            databases.close().await;
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Databases: Failed to open - {:#}", e);
                println!("     Set CHEMBL_DB / CHEMBL_XREF_DB or `chembl config set database.chembl_path <path>`");
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    if all_ok {
        Ok(())
    } else {
        Err(anyhow!("Health check failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transformer_error_carries_code_and_hint() {
        let error = transformer_error(chembl_core::Error::MissingControl("compounds".to_string()));

        assert_eq!(
            error.to_string(),
            "[E800] Required control 'compounds' is missing or empty (try: set the 'compounds' control)"
        );
    }

    #[test]
    fn test_transformer_error_without_hint() {
        let error = transformer_error(chembl_core::Error::UnsupportedColumn(
            "structure".to_string(),
            "BLOB".to_string(),
        ));

        assert_eq!(
            error.to_string(),
            "[E401] Unsupported column type 'BLOB' for column 'structure'"
        );
    }
}
