use crate::config::CrawlerConfig;
use crate::handler::{chain, node_fragment, DocumentedView};
use crate::spec::Manifest;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for the decorated crawler
///
/// Builds OpenAPI documents from chain manifests and shows how each path's
/// decorator chain contributes to it.
#[derive(Parser)]
#[command(name = "decorated-crawler")]
#[command(about = "Merge decorator-chain documentation into OpenAPI operations", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the merged OpenAPI document described by a chain manifest
    Build {
        /// Path to the chain manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Fail on documentation that is not a YAML mapping instead of skipping it
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Show each path's decorator chain and what every layer declares
    Inspect {
        /// Path to the chain manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

/// Serialization format for the built document
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Describe the chains of every path in `manifest`, outermost node first.
pub fn render_inspection(manifest: &Manifest, config: &CrawlerConfig) -> Result<String> {
    let mut out = String::new();
    for (path, view) in manifest.chains()? {
        writeln!(out, "{}", path)?;
        for (depth, node) in chain(view.as_ref()).enumerate() {
            writeln!(out, "  {}. {}: {}", depth + 1, node.name(), describe(node, config))?;
        }
    }
    Ok(out)
}

fn describe(node: &dyn DocumentedView, config: &CrawlerConfig) -> String {
    if node.wrapped().is_none() {
        return "view".to_string();
    }
    match node_fragment(node, config) {
        Ok(Some(fragment)) => {
            let methods: Vec<_> = fragment
                .per_method
                .keys()
                .map(|k| k.as_str().map_or_else(|| format!("{:?}", k), str::to_string))
                .collect();
            let mut summary = if methods.is_empty() {
                "no methods".to_string()
            } else {
                format!("methods [{}]", methods.join(", "))
            };
            if fragment.global_default.is_some() {
                summary.push_str(&format!(", global defaults '{}'", config.defaults_key));
            }
            summary
        }
        Ok(None) => "no fragment".to_string(),
        Err(err) => format!("skipped ({})", err),
    }
}

fn build(manifest_path: &Path, output: Option<&Path>, format: OutputFormat, strict: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let config = CrawlerConfig::from_env();
    let config = if strict { config.strict(true) } else { config };
    let spec = manifest.build(config)?;

    let rendered = match format {
        OutputFormat::Yaml => spec.to_yaml().context("Failed to render YAML")?,
        OutputFormat::Json => spec.to_json().context("Failed to render JSON")?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), paths = spec.paths().len(), "Wrote document");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Execute a parsed command
///
/// # Errors
///
/// Returns an error if:
/// - The manifest cannot be read or parsed
/// - A path references an unknown decorator
/// - Merging fails (e.g. a parameter without `in` or `name`)
/// - The output file cannot be written
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Build {
            manifest,
            output,
            format,
            strict,
        } => build(manifest.as_path(), output.as_deref(), *format, *strict),
        Commands::Inspect { manifest } => {
            let manifest = Manifest::load(manifest.as_path())?;
            print!("{}", render_inspection(&manifest, &CrawlerConfig::from_env())?);
            Ok(())
        }
    }
}

/// Parse the process arguments and execute the command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    execute(&cli)
}
