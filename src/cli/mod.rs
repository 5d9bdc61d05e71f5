use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use dbdi::adducts::CorrelationMethod;
use dbdi::align::{AlignMode, CollisionPolicy};
use dbdi::impute::InterpolationMethod;

mod adducts;
mod align;
mod config;
mod export;
mod impute;
mod info;
mod traces;

/// dbdi - Direct-infusion MS1 data curation
#[derive(Parser)]
#[command(name = "dbdi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Alignment driver
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Peak-by-peak folding (reference)
    Sequential,
    /// One matching pass per scan against the scan-start snapshot
    Batch,
}

/// Resolution of two peaks claiming one feature in the same scan
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CollisionArg {
    /// The peak nearer to the feature mass keeps the cell
    Nearest,
    /// The later peak overwrites the earlier one
    LastWrite,
}

/// Interpolation method for gaps inside a trace
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    /// Straight line between neighbours
    Linear,
    /// Closer neighbour, earlier on ties
    Nearest,
    /// Previous observation carried forward
    Pad,
}

/// Correlation coefficient for trace comparison
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CorrelationArg {
    /// Pearson product-moment correlation
    Pearson,
    /// Spearman rank correlation
    Spearman,
    /// Kendall tau-b
    Kendall,
}

impl From<ModeArg> for AlignMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Sequential => AlignMode::Sequential,
            ModeArg::Batch => AlignMode::Batch,
        }
    }
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Nearest => CollisionPolicy::NearestWins,
            CollisionArg::LastWrite => CollisionPolicy::LastWriteWins,
        }
    }
}

impl From<MethodArg> for InterpolationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Linear => InterpolationMethod::Linear,
            MethodArg::Nearest => InterpolationMethod::Nearest,
            MethodArg::Pad => InterpolationMethod::Pad,
        }
    }
}

impl From<CorrelationArg> for CorrelationMethod {
    fn from(arg: CorrelationArg) -> Self {
        match arg {
            CorrelationArg::Pearson => CorrelationMethod::Pearson,
            CorrelationArg::Spearman => CorrelationMethod::Spearman,
            CorrelationArg::Kendall => CorrelationMethod::Kendall,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Align the scans of an MGF file into a feature table
    Align {
        /// Input MGF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path (defaults to <input>.aligned.csv)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Relative m/z window in ppm
        #[arg(short = 'p', long)]
        ppm: Option<f64>,

        /// Alignment driver
        #[arg(short = 'm', long, value_enum)]
        mode: Option<ModeArg>,

        /// Within-scan collision policy
        #[arg(long, value_enum)]
        collision: Option<CollisionArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Fill the missing cells of an aligned table
    Impute {
        /// Input aligned CSV path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path (defaults to <input>.imputed.csv)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Interpolation method inside the data region
        #[arg(short = 'm', long, value_enum)]
        method: Option<MethodArg>,

        /// Seed of the baseline generator
        #[arg(short = 's', long)]
        seed: Option<u64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Search an imputed table for adducts and in-source fragments
    Adducts {
        /// Input imputed CSV path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output report path (defaults to <input>.adducts.csv or .json)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Correlation coefficient
        #[arg(short = 'm', long, value_enum)]
        method: Option<CorrelationArg>,

        /// Correlation threshold, strictly between 0 and 1
        #[arg(short = 't', long)]
        threshold: Option<f64>,

        /// Mass error in ppm
        #[arg(short = 'e', long)]
        mass_error: Option<f64>,

        /// Custom rules CSV with columns deltamz,motive
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Write the report as JSON instead of CSV
        #[arg(long)]
        json: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Extract selected feature traces as long-format CSV
    Traces {
        /// Input imputed CSV path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Feature identifiers, e.g. ID1,ID7
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// Apply log2 to intensities
        #[arg(long)]
        log2: bool,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Split a feature table back into per-scan spectra (MGF)
    Export {
        /// Input CSV path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output MGF path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Display information about a feature table
    Info {
        /// Input CSV path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Align {
            input,
            output,
            ppm,
            mode,
            collision,
            config,
        } => align::run(
            input,
            output,
            ppm,
            mode.map(AlignMode::from),
            collision.map(CollisionPolicy::from),
            config,
        ),
        Commands::Impute {
            input,
            output,
            method,
            seed,
            config,
        } => impute::run(input, output, method.map(InterpolationMethod::from), seed, config),
        Commands::Adducts {
            input,
            output,
            method,
            threshold,
            mass_error,
            rules,
            json,
            config,
        } => adducts::run(
            input,
            output,
            method.map(CorrelationMethod::from),
            threshold,
            mass_error,
            rules,
            json,
            config,
        ),
        Commands::Traces {
            input,
            ids,
            log2,
            output,
        } => traces::run(input, ids, log2, output),
        Commands::Export { input, output } => export::run(input, output),
        Commands::Info { file } => info::run(file),
    }
}

/// `dir/run.mgf` with suffix `aligned.csv` becomes `dir/run.aligned.csv`
fn derive_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}.{suffix}"))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output() {
        assert_eq!(
            derive_output(Path::new("data/run.mgf"), "aligned.csv"),
            PathBuf::from("data/run.aligned.csv")
        );
        assert_eq!(
            derive_output(Path::new("run.aligned.csv"), "imputed.csv"),
            PathBuf::from("run.aligned.imputed.csv")
        );
    }

    #[test]
    fn test_parse_align_command() {
        let cli = Cli::try_parse_from([
            "dbdi", "-vv", "align", "in.mgf", "--ppm", "5", "--mode", "batch", "--collision", "last-write",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Align {
                ppm, mode, collision, output, ..
            } => {
                assert_eq!(ppm, Some(5.0));
                assert!(matches!(mode, Some(ModeArg::Batch)));
                assert!(matches!(collision, Some(CollisionArg::LastWrite)));
                assert!(output.is_none());
            }
            _ => panic!("expected align"),
        }
    }

    #[test]
    fn test_parse_trace_ids() {
        let cli = Cli::try_parse_from(["dbdi", "traces", "in.csv", "--ids", "ID1,ID5", "--log2"]).unwrap();
        match cli.command {
            Commands::Traces { ids, log2, .. } => {
                assert_eq!(ids, vec!["ID1".to_string(), "ID5".to_string()]);
                assert!(log2);
            }
            _ => panic!("expected traces"),
        }
    }
}
