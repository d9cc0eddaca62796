use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use simfeed::{
    application::{
        assignment::{AssignmentDefaults, AssignmentEngine},
        error::AppError,
        feed::{FeedService, feed_flags},
        providers::PoolProvider,
        scheduler::{SchedulerConfig, growth_sequence},
    },
    cache::{PoolCache, PoolCacheConfig},
    config::{self, ResolveArgs, ScheduleArgs},
    infra::{
        actions::TracingActionSink,
        error::InfraError,
        feed_source::load_feed,
        pools::{ManifestPoolProvider, StaticPoolProvider},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(summary = error.summary(), error = %report.chain(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(summary = error.summary(), error = %report.chain(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        config::Command::Resolve(args) => run_resolve(settings, *args).await,
        config::Command::Schedule(args) => run_schedule(settings, args),
    }
}

async fn run_resolve(settings: config::Settings, args: ResolveArgs) -> Result<(), AppError> {
    let provider: Arc<dyn PoolProvider> = match settings.pools.manifest.as_ref() {
        Some(path) => {
            info!(manifest = %path.display(), "Using pool manifest");
            Arc::new(ManifestPoolProvider::new(path))
        }
        None => {
            info!("No pool manifest configured; using built-in pools");
            Arc::new(StaticPoolProvider::builtin())
        }
    };

    let pools = Arc::new(PoolCache::new(
        PoolCacheConfig::from(&settings.pools),
        provider,
    ));
    let engine = AssignmentEngine::new(
        settings.identity.context.clone(),
        pools,
        AssignmentDefaults {
            placeholder_avatar_url: settings.pools.placeholder_avatar_url.clone(),
        },
    );
    let session = settings.identity.context.run_id().to_string();
    let service = FeedService::new(Arc::new(engine))
        .with_action_sink(Arc::new(TracingActionSink::for_session(session)));

    let mut document = load_feed(&args.feed).await?;
    document.flags = feed_flags(&document, settings.flags.force_all);

    let resolved = service.settle(&document).await;
    info!(
        posts = resolved.len(),
        force_all = document.flags.force_all,
        "Feed resolved"
    );

    let mut stdout = io::stdout().lock();
    for post in &resolved {
        let line = serde_json::to_string(post)
            .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
        writeln!(stdout, "{line}").map_err(InfraError::from)?;
    }
    Ok(())
}

fn run_schedule(settings: config::Settings, args: ScheduleArgs) -> Result<(), AppError> {
    let sequence = growth_sequence(SchedulerConfig::from(&settings.scheduler), args.total);
    info!(total = args.total, steps = sequence.len(), "Schedule computed");

    let mut stdout = io::stdout().lock();
    for count in sequence {
        writeln!(stdout, "{count}").map_err(InfraError::from)?;
    }
    Ok(())
}
