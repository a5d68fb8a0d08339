//! Runtime configuration: layered settings and CLI arguments

mod cli;
mod settings;

pub use cli::{
    parse_args, Cli, Command, EvaluateArgs, HistoryArgs, OutputFormat, PromoteArgs, ScoreArgs,
    StatusArgs,
};
pub use settings::{
    env, Settings, CANDIDATE_METRICS_FILE, CANDIDATE_MODEL_FILE, EVALUATION_RESULT_FILE,
};
