// Command-line entry point for Wirecraft.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use wirecraft::application::ConfigureUsecase;
use wirecraft::domain::config::{parse_binding, ArtifactFormat, Configuration};
use wirecraft::domain::resolver::Resolution;
use wirecraft::infrastructure::{concurrency, DeclarationCache, DiskDeclarationCache};
use wirecraft::ports::{ForwardingHeaderEmitter, IncludeTableEmitter, RedirectionEmitter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project source path(s) to scan (repeatable)
    #[arg(short = 'p', long = "path")]
    paths: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root interface to build
    #[arg(short, long)]
    root: Option<String>,

    /// Explicit binding INTERFACE=IMPLEMENTATION (repeatable)
    #[arg(short, long = "bind")]
    bind: Vec<String>,

    /// Output directory for redirection artifacts
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Artifact format (headers, table)
    #[arg(short, long)]
    format: Option<String>,

    /// Write the resolved implementation source list to this file
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Emit include paths relative to this directory
    #[arg(short = 'I', long)]
    include_base: Option<PathBuf>,

    /// Directory for the incremental extraction cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Worker threads for the scan phase
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbose progress output
    #[arg(short, long)]
    verbose: bool,
}

/// Merge the configuration file with CLI flags; flags win, bindings merge
/// per key with the flag value taking precedence.
fn build_configuration(cli: &Cli) -> Result<Configuration> {
    let mut config = match &cli.config {
        Some(path) => Configuration::from_file(path)?,
        None => Configuration::default(),
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if !cli.paths.is_empty() {
        config.search_paths = cli.paths.clone();
    }
    if let Some(format) = &cli.format {
        config.format = ArtifactFormat::from_str(format).ok_or_else(|| {
            anyhow::anyhow!("unknown format '{format}' (expected headers or table)")
        })?;
    }
    for arg in &cli.bind {
        let (interface, implementation) = parse_binding(arg)?;
        config.bindings.insert(interface, implementation);
    }
    if cli.sources.is_some() {
        config.sources_list = cli.sources.clone();
    }
    if cli.include_base.is_some() {
        config.include_base = cli.include_base.clone();
    }
    if cli.cache_dir.is_some() {
        config.cache_dir = cli.cache_dir.clone();
    }
    if cli.jobs.is_some() {
        config.jobs = cli.jobs;
    }
    config.verbose = cli.verbose;

    config.finalize()
}

fn run(cli: &Cli) -> Result<(Configuration, Resolution)> {
    let config = build_configuration(cli)?;
    concurrency::init_thread_pool(config.jobs, config.verbose)?;

    let disk_cache = match &config.cache_dir {
        Some(dir) => Some(DiskDeclarationCache::open(dir)?),
        None => None,
    };
    let cache: Option<&dyn DeclarationCache> =
        disk_cache.as_ref().map(|c| c as &dyn DeclarationCache);

    let emitter: Box<dyn RedirectionEmitter> = match config.format {
        ArtifactFormat::Headers => {
            Box::new(ForwardingHeaderEmitter::new(config.include_base.clone()))
        }
        ArtifactFormat::Table => Box::new(IncludeTableEmitter::new(config.include_base.clone())),
    };

    let usecase = ConfigureUsecase { emitter: emitter.as_ref(), cache };
    let resolution = usecase.run(&config)?;

    if let Some(cache) = &disk_cache {
        cache.flush()?;
    }

    Ok((config, resolution))
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok((config, resolution)) => println!(
            "Configuration complete! {} interface(s) bound for root {}; artifacts written to {} (format: {})",
            resolution.bindings.len(),
            resolution.root_interface,
            config.output.display(),
            config.format.name()
        ),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
