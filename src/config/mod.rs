//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::flags::forced_from_query;
use crate::domain::identity::IdentityContext;

mod cli;

pub use cli::{
    CliArgs, Command, LoggingOverrides, ResolveArgs, ResolveOverrides, ScheduleArgs,
    ScheduleOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "simfeed";
const ENV_PREFIX: &str = "SIMFEED";
const DEFAULT_RUN_ID: &str = "local";
const DEFAULT_APP_ID: &str = "fb";
const DEFAULT_PROJECT_ID: &str = "default";
const DEFAULT_FEED_ID: &str = "default";
const DEFAULT_FIRST_BATCH: u64 = 8;
const DEFAULT_STEP: u64 = 6;
const DEFAULT_PROXIMITY_THRESHOLD: f64 = 600.0;
const DEFAULT_IDLE_DELAY_MS: u64 = 200;
const DEFAULT_MAX_FETCH_ATTEMPTS: u64 = 3;
const DEFAULT_PLACEHOLDER_AVATAR_URL: &str = "/static/avatars/placeholder.svg";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub identity: IdentitySettings,
    pub flags: FlagSettings,
    pub scheduler: SchedulerSettings,
    pub pools: PoolSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Seed identity of the current session. Validated against the supported
/// app ids at load time.
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub context: IdentityContext,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlagSettings {
    /// Randomize every facet regardless of feed and post flags.
    pub force_all: bool,
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub first_batch: NonZeroUsize,
    pub step: NonZeroUsize,
    pub proximity_threshold: f64,
    pub idle_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Manifest to read pools from; the built-in static pools are used when unset.
    pub manifest: Option<PathBuf>,
    pub max_fetch_attempts: NonZeroU32,
    pub placeholder_avatar_url: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Resolve(args) => raw.apply_resolve_overrides(&args.overrides),
        Command::Schedule(args) => raw.apply_schedule_overrides(&args.overrides),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    identity: RawIdentitySettings,
    flags: RawFlagSettings,
    scheduler: RawSchedulerSettings,
    pools: RawPoolSettings,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_resolve_overrides(&mut self, overrides: &ResolveOverrides) {
        self.apply_logging_overrides(&overrides.logging);

        if let Some(path) = overrides.pools_manifest.as_ref() {
            self.pools.manifest = Some(path.clone());
        }
        if let Some(run_id) = overrides.run_id.as_ref() {
            self.identity.run_id = Some(run_id.clone());
        }
        if let Some(app_id) = overrides.app_id.as_ref() {
            self.identity.app_id = Some(app_id.clone());
        }
        if let Some(project_id) = overrides.project_id.as_ref() {
            self.identity.project_id = Some(project_id.clone());
        }
        if let Some(feed_id) = overrides.feed_id.as_ref() {
            self.identity.feed_id = Some(feed_id.clone());
        }

        let forced_by_query = overrides.query.as_deref().is_some_and(forced_from_query);
        if overrides.force_randomize || forced_by_query {
            self.flags.force_all = Some(true);
        }
    }

    fn apply_schedule_overrides(&mut self, overrides: &ScheduleOverrides) {
        self.apply_logging_overrides(&overrides.logging);

        if let Some(first_batch) = overrides.first_batch {
            self.scheduler.first_batch = Some(first_batch);
        }
        if let Some(step) = overrides.step {
            self.scheduler.step = Some(step);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            identity,
            flags,
            scheduler,
            pools,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let identity = build_identity_settings(identity)?;
        let flags = FlagSettings {
            force_all: flags.force_all.unwrap_or(false),
        };
        let scheduler = build_scheduler_settings(scheduler)?;
        let pools = build_pool_settings(pools)?;

        Ok(Self {
            logging,
            identity,
            flags,
            scheduler,
            pools,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_identity_settings(identity: RawIdentitySettings) -> Result<IdentitySettings, LoadError> {
    let run_id = non_blank(identity.run_id, DEFAULT_RUN_ID, "identity.run_id")?;
    let app_id = non_blank(identity.app_id, DEFAULT_APP_ID, "identity.app_id")?;
    let project_id = non_blank(identity.project_id, DEFAULT_PROJECT_ID, "identity.project_id")?;
    let feed_id = non_blank(identity.feed_id, DEFAULT_FEED_ID, "identity.feed_id")?;

    let context = IdentityContext::new(run_id, app_id, project_id, feed_id)
        .map_err(|err| LoadError::invalid("identity.app_id", err.to_string()))?;

    Ok(IdentitySettings { context })
}

fn build_scheduler_settings(
    scheduler: RawSchedulerSettings,
) -> Result<SchedulerSettings, LoadError> {
    let first_batch = non_zero_usize(
        scheduler.first_batch.unwrap_or(DEFAULT_FIRST_BATCH),
        "scheduler.first_batch",
    )?;
    let step = non_zero_usize(
        scheduler.step.unwrap_or(DEFAULT_STEP),
        "scheduler.step",
    )?;

    let proximity_threshold = scheduler
        .proximity_threshold
        .unwrap_or(DEFAULT_PROXIMITY_THRESHOLD);
    if !proximity_threshold.is_finite() || proximity_threshold < 0.0 {
        return Err(LoadError::invalid(
            "scheduler.proximity_threshold",
            "must be a finite, non-negative distance",
        ));
    }

    let idle_delay = Duration::from_millis(
        scheduler.idle_delay_ms.unwrap_or(DEFAULT_IDLE_DELAY_MS),
    );

    Ok(SchedulerSettings {
        first_batch,
        step,
        proximity_threshold,
        idle_delay,
    })
}

fn build_pool_settings(pools: RawPoolSettings) -> Result<PoolSettings, LoadError> {
    let manifest = pools
        .manifest
        .filter(|path| !path.as_os_str().is_empty());

    let max_fetch_attempts = non_zero_u32(
        pools
            .max_fetch_attempts
            .unwrap_or(DEFAULT_MAX_FETCH_ATTEMPTS),
        "pools.max_fetch_attempts",
    )?;

    let placeholder_avatar_url = non_blank(
        pools.placeholder_avatar_url,
        DEFAULT_PLACEHOLDER_AVATAR_URL,
        "pools.placeholder_avatar_url",
    )?;

    Ok(PoolSettings {
        manifest,
        max_fetch_attempts,
        placeholder_avatar_url,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawIdentitySettings {
    run_id: Option<String>,
    app_id: Option<String>,
    project_id: Option<String>,
    feed_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFlagSettings {
    force_all: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSchedulerSettings {
    first_batch: Option<u64>,
    step: Option<u64>,
    proximity_threshold: Option<f64>,
    idle_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPoolSettings {
    manifest: Option<PathBuf>,
    max_fetch_attempts: Option<u64>,
    placeholder_avatar_url: Option<String>,
}

fn non_blank(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        None => Ok(default.to_string()),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(key, "must not be blank"));
            }
            Ok(trimmed.to_string())
        }
    }
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

fn non_zero_usize(value: u64, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    let value_usize: usize = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for usize"))?;
    NonZeroUsize::new(value_usize).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
