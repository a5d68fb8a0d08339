//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! promover score --predictions predictions.json
//! promover evaluate
//! promover promote
//! promover status --format json
//! promover history --limit 5
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promover: evaluation gate and registry for production classifiers
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "promover")]
#[command(version)]
#[command(about = "Gate candidate binary classifiers and promote them into a versioned registry")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// YAML settings file (overridden by environment and flags)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compare candidate metrics with production and write the verdict
    Evaluate(EvaluateArgs),

    /// Promote the evaluated candidate if its verdict passed
    Promote(PromoteArgs),

    /// Show the current production model
    Status(StatusArgs),

    /// List archived registry records
    History(HistoryArgs),

    /// Build a candidate metrics document from labelled scores
    Score(ScoreArgs),
}

/// Arguments for the evaluate command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct EvaluateArgs {
    /// Candidate metrics document
    #[arg(long, value_name = "FILE")]
    pub candidate_metrics: Option<PathBuf>,

    /// Registry document
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Where to write the verdict
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Override the required val ROC AUC improvement
    #[arg(long)]
    pub min_auc_improvement: Option<f64>,

    /// Override the recall floor
    #[arg(long)]
    pub min_recall_guardrail: Option<f64>,
}

/// Arguments for the promote command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct PromoteArgs {
    /// Verdict written by evaluate
    #[arg(long, value_name = "FILE")]
    pub evaluation: Option<PathBuf>,

    /// Candidate metrics document
    #[arg(long, value_name = "FILE")]
    pub candidate_metrics: Option<PathBuf>,

    /// Candidate model artifact
    #[arg(long, value_name = "FILE")]
    pub candidate_model: Option<PathBuf>,

    /// Registry document
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Registry history directory
    #[arg(long, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Directory receiving versioned production artifacts
    #[arg(long, value_name = "DIR")]
    pub production_dir: Option<PathBuf>,
}

/// Arguments for the status command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct StatusArgs {
    /// Registry document
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Load the artifact and check it against the recorded digest
    #[arg(long)]
    pub verify: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the history command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct HistoryArgs {
    /// Registry history directory
    #[arg(long, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Show only the newest N entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the score command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct ScoreArgs {
    /// JSON file with `val` and `test` label/score arrays
    #[arg(short, long, value_name = "FILE")]
    pub predictions: PathBuf,

    /// Where to write the candidate metrics document
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Recall floor to measure precision at
    #[arg(long)]
    pub min_recall_guardrail: Option<f64>,

    /// Dataset name recorded in the document
    #[arg(long)]
    pub dataset: Option<String>,

    /// Model description recorded in the document
    #[arg(long)]
    pub model_type: Option<String>,
}

/// Output format for read-only commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluate_defaults() {
        let cli = parse_args(["promover", "evaluate"]).unwrap();
        assert_eq!(cli.command, Command::Evaluate(EvaluateArgs::default()));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_evaluate_overrides() {
        let cli = parse_args([
            "promover",
            "evaluate",
            "--candidate-metrics",
            "c.json",
            "--registry",
            "r.json",
            "-o",
            "v.json",
            "--min-auc-improvement",
            "0.02",
            "--min-recall-guardrail",
            "0.9",
        ])
        .unwrap();

        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.candidate_metrics, Some(PathBuf::from("c.json")));
                assert_eq!(args.registry, Some(PathBuf::from("r.json")));
                assert_eq!(args.output, Some(PathBuf::from("v.json")));
                assert_eq!(args.min_auc_improvement, Some(0.02));
                assert_eq!(args.min_recall_guardrail, Some(0.9));
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_parse_promote_paths() {
        let cli = parse_args([
            "promover",
            "promote",
            "--evaluation",
            "e.json",
            "--candidate-model",
            "m.joblib",
            "--production-dir",
            "prod",
        ])
        .unwrap();

        match cli.command {
            Command::Promote(args) => {
                assert_eq!(args.evaluation, Some(PathBuf::from("e.json")));
                assert_eq!(args.candidate_model, Some(PathBuf::from("m.joblib")));
                assert_eq!(args.production_dir, Some(PathBuf::from("prod")));
                assert!(args.history_dir.is_none());
            }
            _ => panic!("Expected Promote command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse_args(["promover", "status", "--config", "p.yaml", "-q"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.yaml")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_status_json() {
        let cli = parse_args(["promover", "status", "--format", "JSON", "--verify"]).unwrap();
        match cli.command {
            Command::Status(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.verify);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_parse_history_limit() {
        let cli = parse_args(["promover", "history", "-n", "3"]).unwrap();
        match cli.command {
            Command::History(args) => {
                assert_eq!(args.limit, Some(3));
                assert_eq!(args.format, OutputFormat::Text);
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_score_requires_predictions() {
        assert!(parse_args(["promover", "score"]).is_err());

        let cli = parse_args(["promover", "score", "-p", "preds.json"]).unwrap();
        match cli.command {
            Command::Score(args) => assert_eq!(args.predictions, PathBuf::from("preds.json")),
            _ => panic!("Expected Score command"),
        }
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(parse_args(["promover", "history", "--format", "yaml"]).is_err());
        assert_eq!("Text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(parse_args(["promover", "deploy"]).is_err());
    }
}
