use anyhow::{Context as AnyhowContext, Result};
use chunkflow_imports::{QuoteStyle, ReconcilerConfig};
use chunkflow_snippets::SessionConfig;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

mod command;
mod fs_util;

pub use command::ROOT_ENV;

#[derive(Parser)]
#[command(name = "chunkflow")]
#[command(about = "Workspace snippets and import reconciliation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace root (overrides CHUNKFLOW_ROOT; discovered from the current directory otherwise)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Keep loaded snippets for the rest of the run
    #[arg(long, global = true)]
    cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List workspace packages as JSON
    Packages(PackagesArgs),

    /// Print the snippets published in the workspace (or `null`)
    Snippets(SnippetsArgs),

    /// Compute (and optionally apply) the imports a snippet needs in a file
    Reconcile(ReconcileArgs),
}

#[derive(Args)]
pub(crate) struct PackagesArgs {
    /// Only packages that depend on this one
    #[arg(long)]
    pub dependents_of: Option<String>,
}

#[derive(Args)]
pub(crate) struct SnippetsArgs {
    /// Package name; the whole workspace when omitted
    #[arg(long, short)]
    pub package: Option<String>,

    /// Editor language id used to filter snippets by scope
    #[arg(long, short)]
    pub language: Option<String>,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["imports", "imports_file", "snippet"])
))]
pub(crate) struct ReconcileArgs {
    /// Source file to reconcile
    pub file: PathBuf,

    /// Required imports as JSON (one object or an array)
    #[arg(long)]
    pub imports: Option<String>,

    /// File holding required imports as JSON
    #[arg(long)]
    pub imports_file: Option<PathBuf>,

    /// Label of a workspace snippet whose required imports to use
    #[arg(long)]
    pub snippet: Option<String>,

    /// Package publishing the snippet (narrows the --snippet lookup)
    #[arg(long, requires = "snippet")]
    pub package: Option<String>,

    /// Editor language id; detected from the file extension otherwise
    #[arg(long)]
    pub language: Option<String>,

    /// Quote style for new import statements: single|double
    #[arg(long, default_value_t = QuoteStyle::Single)]
    pub quote: QuoteStyle,

    /// Omit semicolons from new import statements
    #[arg(long)]
    pub no_semicolons: bool,

    /// Apply the edits to the file
    #[arg(long)]
    pub write: bool,
}

impl ReconcileArgs {
    pub(crate) fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            quote: self.quote,
            semicolons: !self.no_semicolons,
            ..Default::default()
        }
    }
}

/// Settings shared by every subcommand
pub(crate) struct GlobalOptions {
    pub root: Option<PathBuf>,
    pub session: SessionConfig,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let session = SessionConfig {
        cache_snippets: cli.cache,
        ..Default::default()
    };
    session.validate().context("Invalid session configuration")?;
    let options = GlobalOptions {
        root: cli.root,
        session,
    };

    match cli.command {
        Commands::Packages(args) => command::run_packages(args, &options).await?,
        Commands::Snippets(args) => command::run_snippets(args, &options).await?,
        Commands::Reconcile(args) => command::run_reconcile(args, &options).await?,
    }

    Ok(())
}
