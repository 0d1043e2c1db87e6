use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use stoplist_builder::analysis::FrequencyFormula;
use stoplist_builder::config::{ConfigOverrides, StopListConfig};
use stoplist_builder::pipeline::{analyze_staged, StopListBuilder};
use stoplist_builder::source::MediaWikiClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "stoplist",
    version,
    about = "Build a stop list from randomly sampled Wikipedia articles"
)]
struct Cli {
    #[arg(long, global = true, value_name = "FILE", help = "TOML config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample pages, stage the one-hot matrix and write the stop list
    Build(BuildArgs),
    /// Re-analyze a staged one-hot matrix without fetching anything
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct AnalysisArgs {
    #[arg(short, long, help = "limit number of terms that appear in the stop list")]
    limit: Option<usize>,
    #[arg(
        short = 't',
        long = "term-freq",
        help = "fixed frequency cutoff; defaults to the mean column frequency"
    )]
    term_freq: Option<f64>,
    #[arg(long, value_enum)]
    formula: Option<FormulaArg>,
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[arg(short = 'n', long = "num-pages", help = "number of pages used to generate the stop list")]
    num_pages: Option<usize>,
    #[arg(long = "one-hot", value_name = "PATH")]
    one_hot: Option<PathBuf>,
    #[arg(long, help = "skip writing the one-hot staging file")]
    no_stage: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    analysis: AnalysisArgs,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[arg(long = "one-hot", value_name = "PATH")]
    one_hot: Option<PathBuf>,
    #[command(flatten)]
    analysis: AnalysisArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormulaArg {
    /// hits / documents
    Total,
    /// hits / documents without the term
    Misses,
}

impl From<FormulaArg> for FrequencyFormula {
    fn from(arg: FormulaArg) -> Self {
        match arg {
            FormulaArg::Total => FrequencyFormula::OverTotal,
            FormulaArg::Misses => FrequencyFormula::OverMisses,
        }
    }
}

impl AnalysisArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            limit: self.limit,
            term_freq: self.term_freq,
            formula: self.formula.map(Into::into),
            stop_list_path: self.output.clone(),
            ..ConfigOverrides::default()
        }
    }
}

impl BuildArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            num_pages: self.num_pages,
            one_hot_path: self.one_hot.clone(),
            no_stage: self.no_stage,
            seed: self.seed,
            ..self.analysis.overrides()
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<StopListConfig> {
    let config = match path {
        Some(path) => StopListConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StopListConfig::v0(),
    };
    Ok(config.with_env_overrides())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Build(args) => {
            config.apply_overrides(&args.overrides());

            let client = MediaWikiClient::new(config.client.clone())
                .context("failed to build HTTP client")?;
            let report = StopListBuilder::new(config, client)
                .context("invalid configuration")?
                .run()
                .context("stop list build failed")?;

            println!(
                "{} terms written from {} pages ({} attempts, {} duplicates skipped, {} distinct terms)",
                report.stop_list.len(),
                report.pages,
                report.attempts,
                report.duplicates_skipped,
                report.vocabulary_size,
            );
        }
        Commands::Analyze(args) => {
            config.apply_overrides(&args.analysis.overrides());
            let one_hot = args
                .one_hot
                .or_else(|| config.one_hot_path.clone())
                .context("no one-hot file given (use --one-hot)")?;

            let stop_list = analyze_staged(&one_hot, &config)
                .with_context(|| format!("failed to analyze {}", one_hot.display()))?;

            println!(
                "{} terms written from {} documents (threshold {:.4})",
                stop_list.len(),
                stop_list.metadata.documents,
                stop_list.metadata.threshold,
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoplist_builder::analysis::Threshold;

    fn build_config(args: &[&str]) -> StopListConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Build(build) = cli.command else {
            panic!("expected build subcommand");
        };
        let mut config = StopListConfig::v0();
        config.apply_overrides(&build.overrides());
        config
    }

    #[test]
    fn build_without_flags_keeps_loaded_config() {
        assert_eq!(build_config(&["stoplist", "build"]), StopListConfig::v0());
    }

    #[test]
    fn build_flags_override_config() {
        let config = build_config(&[
            "stoplist", "build", "-n", "12", "-l", "30", "-t", "0.25", "--formula", "misses",
            "--one-hot", "stage/m.csv", "--seed", "5", "-o", "out.txt",
        ]);
        assert_eq!(config.num_pages, 12);
        assert_eq!(config.limit, Some(30));
        assert_eq!(config.threshold, Threshold::Fixed(0.25));
        assert_eq!(config.formula, FrequencyFormula::OverMisses);
        assert_eq!(config.one_hot_path, Some(PathBuf::from("stage/m.csv")));
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.stop_list_path, PathBuf::from("out.txt"));
    }

    #[test]
    fn no_stage_wins_over_one_hot() {
        let config = build_config(&["stoplist", "build", "--one-hot", "m.csv", "--no-stage"]);
        assert_eq!(config.one_hot_path, None);
    }

    #[test]
    fn flags_win_over_file_and_env() {
        let file = StopListConfig::from_toml_str(
            "limit = 5\nthreshold = { fixed = 0.5 }\n[client]\ntimeout_ms = 10\nrate_limit_ms = 1\n",
            std::path::Path::new("cli.toml"),
        )
        .unwrap();
        let mut config = file.with_overrides_from(|key| {
            (key == "STOPLIST_TIMEOUT_MS").then(|| "20".to_string())
        });

        let cli = Cli::try_parse_from(["stoplist", "analyze", "-l", "9"]).unwrap();
        let Commands::Analyze(analyze) = cli.command else {
            panic!("expected analyze subcommand");
        };
        config.apply_overrides(&analyze.analysis.overrides());

        assert_eq!(config.limit, Some(9));
        assert_eq!(config.threshold, Threshold::Fixed(0.5));
        assert_eq!(config.client.timeout_ms, 20);
        assert_eq!(config.client.rate_limit_ms, 1);
    }

    #[test]
    fn rejects_unknown_formula() {
        assert!(Cli::try_parse_from(["stoplist", "build", "--formula", "median"]).is_err());
    }
}
