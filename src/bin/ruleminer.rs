use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use u_ruleminer::config::RunConfig;
use u_ruleminer::detect::{sample_records, Detector};
use u_ruleminer::io::{ArffLoader, DatasetLoader, DelimitedRuleset};
use u_ruleminer::mining::mine_rules;
use u_ruleminer::random::rng_from;

#[derive(Parser)]
#[command(name = "ruleminer")]
#[command(version, about = "Evolutionary rule mining for network-intrusion detection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine a ruleset from a labelled dataset
    Train {
        /// Training dataset (ARFF)
        data: PathBuf,
        /// Output ruleset, one rule per line
        rules: PathBuf,
        /// JSON run configuration
        config: Option<PathBuf>,
    },
    /// Apply a mined ruleset to a held-out dataset
    Test {
        /// Test dataset (ARFF)
        data: PathBuf,
        /// Ruleset written by `train`
        rules: PathBuf,
        /// JSON run configuration
        config: Option<PathBuf>,
    },
}

fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<RunConfig> {
    match path {
        Some(p) => RunConfig::from_json_file(p)
            .with_context(|| format!("reading config {}", p.display())),
        None => Ok(RunConfig::default()),
    }
}

fn loader(config: &RunConfig) -> ArffLoader {
    ArffLoader::new(config.generators.clone(), config.equality_tolerance)
}

fn train(data: &Path, rules: &Path, config: &RunConfig) -> Result<()> {
    let dataset = loader(config)
        .load(data)
        .with_context(|| format!("loading training set {}", data.display()))?;
    let outcome = mine_rules(&dataset, config.fitness_weights, &config.ga_config())
        .context("training failed")?;

    DelimitedRuleset::default()
        .save(&outcome.ruleset, rules)
        .with_context(|| format!("writing ruleset {}", rules.display()))?;

    let best = outcome.run.history.last().map(|s| s.best).unwrap_or_default();
    info!(
        rules = outcome.ruleset.len(),
        generations = outcome.run.generations,
        best_fitness = best,
        path = %rules.display(),
        "ruleset written"
    );
    Ok(())
}

fn test(data: &Path, rules: &Path, config: &RunConfig) -> Result<()> {
    let dataset = loader(config)
        .load(data)
        .with_context(|| format!("loading test set {}", data.display()))?;
    let ruleset = DelimitedRuleset::default()
        .load(dataset.schema(), rules)
        .with_context(|| format!("reading ruleset {}", rules.display()))?;

    let mut rng = rng_from(config.seed);
    let sample = sample_records(dataset.records(), config.test_sample_size, &mut rng);
    let report = Detector::new(dataset.schema(), &ruleset)?
        .with_policy(config.detection_policy)
        .evaluate(&sample)
        .context("testing failed")?;

    println!("{report}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Train {
            data,
            rules,
            config,
        } => train(&data, &rules, &load_config(config.as_ref())?),
        Commands::Test {
            data,
            rules,
            config,
        } => test(&data, &rules, &load_config(config.as_ref())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_with_optional_config() {
        let cli = Cli::try_parse_from(["ruleminer", "train", "kdd.arff", "rules.csv"]).unwrap();
        match cli.command {
            Commands::Train {
                data,
                rules,
                config,
            } => {
                assert_eq!(data, PathBuf::from("kdd.arff"));
                assert_eq!(rules, PathBuf::from("rules.csv"));
                assert!(config.is_none());
            }
            Commands::Test { .. } => panic!("parsed as test"),
        }

        let cli = Cli::try_parse_from(["ruleminer", "test", "t.arff", "r.csv", "run.json"]).unwrap();
        match cli.command {
            Commands::Test { config, .. } => assert_eq!(config, Some(PathBuf::from("run.json"))),
            Commands::Train { .. } => panic!("parsed as train"),
        }
    }

    #[test]
    fn test_rejects_missing_and_unknown_arguments() {
        assert!(Cli::try_parse_from(["ruleminer", "train", "kdd.arff"]).is_err());
        assert!(Cli::try_parse_from(["ruleminer", "score", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["ruleminer", "test", "a", "b", "c", "d"]).is_err());
    }
}
