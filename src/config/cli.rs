use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the simfeed binary.
#[derive(Debug, Parser)]
#[command(
    name = "simfeed",
    version,
    about = "Deterministic content assignment for simulated feeds"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "SIMFEED_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Resolve display fields for every post in a feed file.
    Resolve(Box<ResolveArgs>),
    /// Print the mount sequence of the progressive feed scheduler.
    Schedule(ScheduleArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct ResolveArgs {
    /// Feed document (JSON) to resolve.
    #[arg(long = "feed", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub feed: PathBuf,

    #[command(flatten)]
    pub overrides: ResolveOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ResolveOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Pool manifest (TOML) to fetch avatar and image pools from.
    #[arg(long = "pools", value_name = "MANIFEST", value_hint = ValueHint::FilePath)]
    pub pools_manifest: Option<PathBuf>,

    /// Override the run identifier.
    #[arg(long = "run-id", value_name = "ID")]
    pub run_id: Option<String>,

    /// Override the app identifier (fb|ig).
    #[arg(long = "app-id", value_name = "ID")]
    pub app_id: Option<String>,

    /// Override the project identifier.
    #[arg(long = "project-id", value_name = "ID")]
    pub project_id: Option<String>,

    /// Override the feed identifier.
    #[arg(long = "feed-id", value_name = "ID")]
    pub feed_id: Option<String>,

    /// Randomize every facet regardless of feed flags.
    #[arg(long = "force-randomize", action = clap::ArgAction::SetTrue)]
    pub force_randomize: bool,

    /// Query string to inspect for `randomize=1` or `debug=1`.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ScheduleArgs {
    /// Number of posts in the feed.
    #[arg(long = "total", value_name = "COUNT")]
    pub total: usize,

    #[command(flatten)]
    pub overrides: ScheduleOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ScheduleOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Override the number of posts mounted initially.
    #[arg(long = "first-batch", value_name = "COUNT")]
    pub first_batch: Option<u64>,

    /// Override the number of posts added per trigger.
    #[arg(long = "step", value_name = "COUNT")]
    pub step: Option<u64>,
}
