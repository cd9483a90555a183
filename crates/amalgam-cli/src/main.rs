//! cpp-amalgamate CLI
//!
//! Merges `<BASE_DIR>/src` and everything it includes into
//! `<OUTPUT_DIR>/<NAME>.hpp` and `<OUTPUT_DIR>/<NAME>.cpp`.

use amalgam_core::AmalgamConfig;
use amalgam_emit::write_amalgamation;
use amalgam_scan::scan_tree;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "amalgamate")]
#[command(author, version, about = "Merge a C/C++ source tree into one header and one source file", long_about = None)]
struct Cli {
    /// Project directory containing `src/` and `include/`
    #[arg(value_name = "BASE_DIR")]
    base_dir: PathBuf,

    /// Directory the amalgamation is written to
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Base name of the output files
    #[arg(value_name = "NAME")]
    name: String,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional include directory (repeatable)
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Additional source directory (repeatable)
    #[arg(short = 'S', long = "source-dir", value_name = "DIR")]
    source_dirs: Vec<PathBuf>,

    /// Header output extension
    #[arg(long, value_name = "EXT")]
    header_ext: Option<String>,

    /// Source output extension
    #[arg(long, value_name = "EXT")]
    source_ext: Option<String>,

    /// Skip walked source files matching this glob (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Do not resolve `./` and `../` includes against the including file
    #[arg(long)]
    no_relative_includes: bool,

    /// Write the emission order as JSON
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Merge the config file (if any) with command-line overrides
    fn build_config(&self) -> Result<AmalgamConfig> {
        let mut config = match &self.config {
            Some(path) => AmalgamConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AmalgamConfig::default(),
        };

        config.base_dir = self.base_dir.clone();
        config.output.dir = self.output_dir.clone();
        config.output.name = self.name.clone();
        config.search.include_dirs.extend(self.include_dirs.iter().cloned());
        config.search.source_dirs.extend(self.source_dirs.iter().cloned());
        config.search.exclude.extend(self.exclude.iter().cloned());

        if let Some(ext) = &self.header_ext {
            config.set_header_extension(ext);
        }
        if let Some(ext) = &self.source_ext {
            config.set_source_extension(ext);
        }
        if self.no_relative_includes {
            config.search.relative_includes = false;
        }
        if self.manifest.is_some() {
            config.output.manifest = self.manifest.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.build_config()?;
    tracing::info!("Base dir: {}", config.base_dir.display());
    tracing::info!("Output dir: {}", config.output.dir.display());
    tracing::info!("Output name: {}", config.output.name);

    let (queues, report) = scan_tree(&config)
        .with_context(|| format!("scanning {}", config.base_dir.display()))?;
    let summary = write_amalgamation(&config, &queues, Some(&report))
        .with_context(|| format!("writing amalgamation to {}", config.output.dir.display()))?;

    if cli.json {
        let result = serde_json::json!({
            "scan": report,
            "output": summary,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("📦 Amalgamation written:");
        println!(
            "   {} ({} headers, {} bytes)",
            summary.header_path.display(),
            summary.headers_written,
            summary.header_bytes
        );
        println!(
            "   {} ({} sources, {} bytes)",
            summary.source_path.display(),
            summary.sources_written,
            summary.source_bytes
        );
        if report.unresolved_includes > 0 {
            println!("   {} unresolved includes skipped", report.unresolved_includes);
        }
    }

    Ok(())
}
