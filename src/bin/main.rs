//! Describo Profile CLI
//!
//! Command-line tool for building a Describo profile from schema.org and
//! vocabulary extensions.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use describo_profile::{
    build_profile, to_json_string, BaseSource, BuildOptions, BuildResult, FilesystemLoader,
    ProfileConfig, ProfileError,
};

const DEFAULT_OUTPUT: &str = "types/type-definitions.json";

#[derive(Parser)]
#[command(name = "describo-profile")]
#[command(about = "Build a Describo profile from schema.org and vocabulary extensions")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the profile and write it to a file
    Build(BuildArgs),
    /// Build the profile without writing it
    Check(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Path or URL of the base vocabulary (schema.org JSON-LD)
    #[arg(short, long)]
    schema: String,

    /// Directory of vocabulary extensions (folders or zip files)
    #[arg(short, long)]
    extensions: Option<PathBuf>,

    /// TOML file with rule tables (default: built-in tables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave out extensions without a root dataset instead of failing
    #[arg(long)]
    skip_invalid_extensions: bool,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("describo_profile={}", level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ProfileConfig, ProfileError> {
    match path {
        Some(path) => ProfileConfig::load(path),
        None => Ok(ProfileConfig::default()),
    }
}

fn run_pipeline(args: &SourceArgs) -> Result<BuildResult, ProfileError> {
    let rules = load_config(args.config.as_deref())?.rules()?;
    let loader = FilesystemLoader::new(BaseSource::parse(&args.schema), args.extensions.clone());
    let options = BuildOptions {
        skip_invalid_extensions: args.skip_invalid_extensions,
    };
    build_profile(&loader, &rules, &options)
}

fn report(result: &BuildResult) {
    for source in &result.stats.sources {
        eprintln!(
            "  {}: {} classes, {} properties",
            source.name, source.classes, source.properties
        );
    }
    eprintln!(
        "Built {} definitions ({} renamed), {} inputs joined, {} joins skipped",
        result.stats.definitions,
        result.stats.renamed_classes,
        result.stats.inputs_joined,
        result.stats.joins_skipped
    );
    if !result.diagnostics.is_empty() {
        eprintln!("{} warning(s):", result.diagnostics.len());
        for diagnostic in &result.diagnostics {
            eprintln!("  {}", diagnostic);
        }
    }
}

/// Write output, creating parent directories as needed
fn write_output(content: &str, path: &Path) -> Result<(), ProfileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    eprintln!("Wrote profile to {}", path.display());
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), ProfileError> {
    let result = run_pipeline(&args.source)?;
    report(&result);

    let output = to_json_string(&result.profile, args.pretty)?;
    write_output(&output, &args.output)
}

fn run_check(args: SourceArgs) -> Result<(), ProfileError> {
    let result = run_pipeline(&args)?;
    report(&result);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Check(args) => run_check(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
