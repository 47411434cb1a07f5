use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use structurefold::core::models::bases::DEFAULT_TARGET_BASES;
use structurefold::engine::tasks::coverage::DEFAULT_OVERLAP_THRESHOLD;
use structurefold::engine::tasks::specificity::{DEFAULT_DIGITS, DEFAULT_REPORT_BASES};
use structurefold::engine::tasks::statistics::{DEFAULT_MIN_LENGTH, DEFAULT_TRIM};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "sf3",
    author = "StructureFold Developers",
    version,
    about = "StructureFold CLI - converts Structure-seq alignments into RT-stop profiles and per-nucleotide reactivities.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process SAM files concurrently.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count RT stops in SAM files, writing one <.rtsc> per input and a filter log.
    SamToRtsc(SamToRtscArgs),
    /// Derive per-nucleotide reactivity from a control and a treatment <.rtsc>.
    RtscToReact(RtscToReactArgs),
    /// Sum several <.rtsc> files, typically replicates of one sample.
    Combine(CombineArgs),
    /// Report RT-stop coverage per transcript for one or more <.rtsc> files.
    Coverage(CoverageArgs),
    /// Report which nucleotides RT stops fall on for one or more <.rtsc> files.
    Specificity(SpecificityArgs),
    /// Summarize <.react> files with max, average, std and Gini per transcript.
    ReactStats(ReactStatsArgs),
}

/// Arguments for the `sam-to-rtsc` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SamToRtscArgs {
    /// Reference FASTA the reads were aligned to.
    #[arg(required = true, value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Input SAM file(s).
    #[arg(required = true, num_args = 1.., value_name = "SAM")]
    pub sam: Vec<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Filter Overrides ---
    /// Maximum allowed mismatches/indels per alignment.
    #[arg(long, value_name = "INT")]
    pub mismatches: Option<u32>,

    /// Accept alignments whose first base is mismatched.
    #[arg(long)]
    pub first_mismatch: bool,

    /// Accept alignments to the reverse strand.
    #[arg(long)]
    pub reverse: bool,

    /// Keep secondary alignments instead of rejecting them.
    #[arg(long)]
    pub keep_secondary: bool,

    // --- Output ---
    /// Directory for the <.rtsc> files. Defaults to each SAM file's directory.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Name of the filter log <.csv>.
    #[arg(long, value_name = "NAME")]
    pub log_name: Option<String>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S filter.max-mismatches=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `rtsc-to-react` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RtscToReactArgs {
    /// Control (reagent-minus) <.rtsc>.
    #[arg(required = true, value_name = "CONTROL")]
    pub control: PathBuf,

    /// Treatment (reagent-plus) <.rtsc>.
    #[arg(required = true, value_name = "TREATMENT")]
    pub treatment: PathBuf,

    /// Reference FASTA used to generate both <.rtsc> files.
    #[arg(required = true, value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Limit the analysis to the transcripts listed in this file.
    #[arg(long, value_name = "TXT")]
    pub restrict: Option<PathBuf>,

    /// Normalize with an existing <.scale> instead of computing one.
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<PathBuf>,

    // --- Reactivity Overrides ---
    /// Cap for final reactivity values.
    #[arg(long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Do not take the natural log of stop counts.
    #[arg(long)]
    pub ln_off: bool,

    /// Do not divide by the normalization scale.
    #[arg(long)]
    pub nrm_off: bool,

    /// Nucleotides the reagent reacts with.
    #[arg(long, value_name = "BASES")]
    pub bases: Option<String>,

    // --- Output ---
    /// Write transcripts without a usable scale to a text file.
    #[arg(long)]
    pub save_fails: bool,

    /// Output <.react> name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S reactivity.threshold=5.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `combine` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    /// Input <.rtsc> files.
    #[arg(required = true, num_args = 1.., value_name = "RTSC")]
    pub rtsc: Vec<PathBuf>,

    /// Output <.rtsc> name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Arguments for the `coverage` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CoverageArgs {
    /// Reference FASTA.
    #[arg(required = true, value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Input <.rtsc> files.
    #[arg(required = true, num_args = 1.., value_name = "RTSC")]
    pub rtsc: Vec<PathBuf>,

    /// Nucleotides counted towards coverage.
    #[arg(long, default_value = DEFAULT_TARGET_BASES, value_name = "BASES")]
    pub bases: String,

    /// Also write the transcripts passing the overlap threshold in every file.
    #[arg(long)]
    pub overlap: bool,

    /// Minimum coverage for the overlap list.
    #[arg(long, default_value_t = DEFAULT_OVERLAP_THRESHOLD, value_name = "FLOAT")]
    pub overlap_threshold: f64,

    /// Output <.csv> name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Output overlap <.txt> name.
    #[arg(long, value_name = "NAME")]
    pub overlap_name: Option<String>,
}

/// Arguments for the `specificity` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SpecificityArgs {
    /// Reference FASTA used to generate the <.rtsc> files.
    #[arg(required = true, value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Input <.rtsc> files.
    #[arg(required = true, num_args = 1.., value_name = "RTSC")]
    pub rtsc: Vec<PathBuf>,

    /// Nucleotides included in the report.
    #[arg(long, default_value = DEFAULT_REPORT_BASES, value_name = "BASES")]
    pub report: String,

    /// Decimal places for specificity values.
    #[arg(long, default_value_t = DEFAULT_DIGITS, value_name = "INT")]
    pub digits: u32,

    /// Output <.csv> name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Arguments for the `react-stats` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReactStatsArgs {
    /// Input <.react> files.
    #[arg(required = true, num_args = 1.., value_name = "REACT")]
    pub react: Vec<PathBuf>,

    /// Limit the analysis to the transcripts listed in this file.
    #[arg(long, value_name = "TXT")]
    pub restrict: Option<PathBuf>,

    /// Ignore this many trailing positions of every transcript.
    #[arg(long, default_value_t = DEFAULT_TRIM, value_name = "INT")]
    pub trim: usize,

    /// Minimum number of numeric values required after trimming.
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH, value_name = "INT")]
    pub minlen: usize,

    /// Output <.csv> name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sam_to_rtsc_parses_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "sf3",
            "-vv",
            "sam-to-rtsc",
            "ref.fa",
            "a.sam",
            "b.sam",
            "--mismatches",
            "2",
            "--reverse",
            "-S",
            "filter.reject-secondary=false",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::SamToRtsc(args) = cli.command else {
            panic!("expected sam-to-rtsc");
        };
        assert_eq!(args.fasta, PathBuf::from("ref.fa"));
        assert_eq!(args.sam, vec![PathBuf::from("a.sam"), PathBuf::from("b.sam")]);
        assert_eq!(args.mismatches, Some(2));
        assert!(args.reverse);
        assert!(!args.first_mismatch);
        assert_eq!(args.set_values, vec!["filter.reject-secondary=false"]);
    }

    #[test]
    fn analysis_defaults_are_applied() {
        let cli = Cli::try_parse_from(["sf3", "coverage", "ref.fa", "x.rtsc"]).unwrap();
        let Commands::Coverage(args) = cli.command else {
            panic!("expected coverage");
        };
        assert_eq!(args.bases, "AC");
        assert_eq!(args.overlap_threshold, 1.0);

        let cli = Cli::try_parse_from(["sf3", "react-stats", "x.react"]).unwrap();
        let Commands::ReactStats(args) = cli.command else {
            panic!("expected react-stats");
        };
        assert_eq!((args.trim, args.minlen), (20, 10));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sf3", "-q", "-v", "combine", "a.rtsc"]).is_err());
    }
}
