//! qdeps Explainer Binary
//!
//! Run with: `qdeps-explain --manifest app.toml [COMMAND]`

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use qdeps::{CallPath, TypeDescriptor};
use qdeps_explain::{
    plan, render, render_plan_text, render_resolve_text, Config, Manifest, OutputFormat,
    ResolveReport, Wiring,
};

#[derive(Parser)]
#[command(name = "qdeps-explain")]
#[command(about = "Explain which bindings qdeps selects for a manifest")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Binding manifest (TOML)
    #[arg(short, long, global = true, env = "QDEPS_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Configuration file path (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one request and show the winning binding
    Resolve {
        /// Requested type, e.g. `Engine` or `const Ptr<Logger>&`
        ty: String,

        /// Call path, outermost first (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<String>,

        /// Also list every applicable binding in selection order
        #[arg(long)]
        candidates: bool,
    },

    /// Walk the dependency plan below a root type
    Plan {
        /// Root type
        root: String,

        /// Maximum call path length
        #[arg(long)]
        max_depth: Option<usize>,

        /// Fail on types the manifest does not declare
        #[arg(long)]
        require_declared: bool,
    },

    /// Print the default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = build_config(&cli)?;

    match &cli.command {
        Commands::Config => {
            print!("{}", Config::default().to_toml()?);
        }
        Commands::Resolve { ty, path, candidates } => {
            config.show_candidates |= *candidates;
            let wiring = load_wiring(&cli)?;
            let requested = parse_type(ty)?;
            let path = path
                .iter()
                .map(|frame| parse_type(frame))
                .collect::<Result<CallPath>>()?;

            let report = ResolveReport::build(&wiring.resolver(), &requested, &path, &config);
            info!("{} resolved to {}", requested, report.winner.given);
            println!("{}", render(&report, render_resolve_text, &config)?.trim_end());
        }
        Commands::Plan { root, max_depth, require_declared } => {
            if let Some(max_depth) = max_depth {
                config.max_depth = *max_depth;
            }
            config.require_declared |= *require_declared;
            let wiring = load_wiring(&cli)?;
            let root = parse_type(root)?;

            let node = plan(&wiring, &root, &config)
                .with_context(|| format!("Failed to plan `{}`", root))?;
            info!("planned {} injection points below {}", node.size(), root);
            println!("{}", render(&node, render_plan_text, &config)?.trim_end());
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Override with CLI options
    if let Some(format) = cli.format {
        config.format = format;
    }
    debug!(?config, "configuration");

    Ok(config)
}

fn load_wiring(cli: &Cli) -> Result<Wiring> {
    let path = cli
        .manifest
        .as_ref()
        .context("No manifest given (use --manifest or QDEPS_MANIFEST)")?;
    let manifest = Manifest::load(path)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
    let wiring = manifest
        .wire()
        .with_context(|| format!("Failed to wire manifest: {}", path.display()))?;
    debug!(bindings = wiring.registry().len(), "loaded {}", path.display());
    Ok(wiring)
}

fn parse_type(spelling: &str) -> Result<TypeDescriptor> {
    spelling
        .parse()
        .with_context(|| format!("Invalid type: {}", spelling))
}
