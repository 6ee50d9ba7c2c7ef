//! Password export reconciliation CLI
//!
//! Command-line tool for comparing a legacy vault export against a browser
//! password store export.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use pwr_core::{
    analyze, convert_legacy, load_records, run as run_reconcile, scan_exports, ReconcileConfig,
    SourceKind,
};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pwr-cli")]
#[command(about = "Reconcile a legacy vault export with a browser password store", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the two exports and write the report files
    Reconcile {
        /// Legacy vault export (CSV)
        #[arg(short, long, required_unless_present = "config")]
        legacy: Option<PathBuf>,

        /// Browser password store export (CSV)
        #[arg(short, long, required_unless_present = "config")]
        reference: Option<PathBuf>,

        /// Output directory for report files
        #[arg(short, long, default_value = "reconcile-out")]
        output: PathBuf,

        /// Hide passwords in the Markdown comparison
        #[arg(long)]
        mask_passwords: bool,

        /// Read paths and options from a config file (JSON)
        #[arg(short, long, conflicts_with_all = ["legacy", "reference"])]
        config: Option<PathBuf>,
    },

    /// Print coverage statistics without writing any files
    Stats {
        /// Legacy vault export (CSV)
        #[arg(short, long)]
        legacy: PathBuf,

        /// Browser password store export (CSV)
        #[arg(short, long)]
        reference: PathBuf,
    },

    /// Convert a legacy export into the browser CSV shape
    Convert {
        /// Legacy vault export (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Scan directories for export files and report their shape
    Scan {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// Create a config file template
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,

        /// Legacy vault export to reference in the config
        #[arg(long, default_value = "vault_export.csv")]
        legacy: PathBuf,

        /// Browser export to reference in the config
        #[arg(long, default_value = "browser_passwords.csv")]
        reference: PathBuf,

        /// Output directory to reference in the config
        #[arg(long, default_value = "reconcile-out")]
        output_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Warning: failed to initialize logger: {}", e);
    }
}

fn run(command: Commands) -> pwr_core::Result<()> {
    match command {
        Commands::Reconcile {
            legacy,
            reference,
            output,
            mask_passwords,
            config,
        } => {
            let config = match (config, legacy, reference) {
                (Some(path), _, _) => ReconcileConfig::load(path)?,
                (None, Some(legacy), Some(reference)) => {
                    ReconcileConfig::new(legacy, reference, output)
                        .with_mask_passwords(mask_passwords)
                }
                (None, _, _) => {
                    unreachable!("clap requires --legacy and --reference without --config")
                }
            };
            cmd_reconcile(&config)
        }
        Commands::Stats { legacy, reference } => cmd_stats(&legacy, &reference),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Scan { root } => cmd_scan(&root),
        Commands::InitConfig {
            output,
            legacy,
            reference,
            output_dir,
        } => cmd_init_config(&output, legacy, reference, output_dir),
    }
}

fn cmd_reconcile(config: &ReconcileConfig) -> pwr_core::Result<()> {
    let summary = run_reconcile(config)?;

    println!("Legacy:    {}", config.legacy_path.display());
    println!("Reference: {}", config.reference_path.display());
    println!();
    println!("Only in legacy:  {}", summary.only_in_legacy);
    println!("Differing:       {}", summary.differing);
    println!(
        "Sites in both:   {} of {} legacy sites",
        summary.stats.sites_in_both, summary.stats.legacy_sites
    );
    println!();
    println!("Report files:");
    for path in summary.outputs.all() {
        println!("  {}", path.display());
    }

    Ok(())
}

fn cmd_stats(legacy_path: &Path, reference_path: &Path) -> pwr_core::Result<()> {
    let legacy = load_records(legacy_path, SourceKind::Legacy)?;
    let reference = load_records(reference_path, SourceKind::Reference)?;

    let (result, stats) = analyze(&legacy, &reference);

    let entries: Vec<(&str, usize)> = stats
        .source_counts()
        .into_iter()
        .chain(stats.site_overlap())
        .collect();
    let width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    for (label, value) in entries {
        println!("{:<width$}  {}", label, value, width = width);
    }
    println!();
    println!("{:<width$}  {}", "Records only in legacy", result.only_in_legacy.len(), width = width);
    println!("{:<width$}  {}", "Records differing", result.differing.len(), width = width);

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> pwr_core::Result<()> {
    let written = convert_legacy(input, output)?;
    println!("Converted {} records to {}", written, output.display());
    Ok(())
}

fn cmd_scan(roots: &[PathBuf]) -> pwr_core::Result<()> {
    let result = scan_exports(roots)?;

    println!("Scanned {} root(s):", result.roots.len());
    for root in &result.roots {
        println!("  {}", root.display());
    }
    println!();
    println!("Found {} CSV files:", result.exports.len());

    for export in &result.exports {
        let kind = match export.kind {
            Some(kind) => kind.to_string(),
            None => "unrecognised".to_string(),
        };
        println!("  [{}] {}", kind, export.path.display());
    }

    if let Some((legacy, reference)) = result.unique_pair() {
        println!();
        println!("To reconcile, run:");
        println!(
            "  pwr-cli reconcile --legacy {} --reference {}",
            legacy.display(),
            reference.display()
        );
    }

    Ok(())
}

fn cmd_init_config(
    output: &Path,
    legacy: PathBuf,
    reference: PathBuf,
    output_dir: PathBuf,
) -> pwr_core::Result<()> {
    let config = ReconcileConfig::new(legacy, reference, output_dir);

    config.save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to point at your exports, then run:");
    println!("  pwr-cli reconcile --config {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reconcile_needs_both_exports_without_config() {
        assert!(Cli::try_parse_from(["pwr-cli", "reconcile"]).is_err());
        assert!(Cli::try_parse_from(["pwr-cli", "reconcile", "-l", "a.csv"]).is_err());
        assert!(Cli::try_parse_from(["pwr-cli", "reconcile", "-r", "b.csv"]).is_err());
    }

    #[test]
    fn test_reconcile_accepts_either_paths_or_config() {
        let cli = Cli::try_parse_from(["pwr-cli", "reconcile", "-l", "a.csv", "-r", "b.csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Reconcile { legacy: Some(_), reference: Some(_), config: None, .. }
        ));

        let cli = Cli::try_parse_from(["pwr-cli", "reconcile", "-c", "pwr.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Reconcile { legacy: None, reference: None, config: Some(_), .. }
        ));

        assert!(Cli::try_parse_from(["pwr-cli", "reconcile", "-c", "pwr.json", "-l", "a.csv"]).is_err());
    }
}
