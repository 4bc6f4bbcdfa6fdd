use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use health_triage::adapters::channels::LoggingChannelAdapter;
use health_triage::adapters::dispatch::WorkerRoster;
use health_triage::adapters::events::{LoggingEventPublisher, PublishingAnalyticsSink};
use health_triage::adapters::http::{app_router, TriageHandlers};
use health_triage::adapters::records::InMemoryMedicalRecords;
use health_triage::adapters::reply::{
    FailoverReplyGenerator, OpenAIReplyConfig, OpenAIReplyGenerator, TemplateReplyGenerator,
};
use health_triage::adapters::storage::InMemorySessionRepository;
use health_triage::application::{
    DeliveryConfig, GetSessionHandler, HandleMessageConfig, HandleMessageHandler,
    OutboundDispatcher, SessionStore, SessionSweeper, SweepConfig,
};
use health_triage::config::AppConfig;
use health_triage::domain::assessment::RandomPhraseSelector;
use health_triage::domain::conversation::ConversationPlanner;
use health_triage::domain::foundation::Platform;
use health_triage::domain::triage::TriageRuleTable;
use health_triage::ports::{AnalyticsSink, ReplyGenerator, SessionRepository};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_new(&config.server.log_filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if config.server.log_pretty {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    }

    if let Err(err) = config.validate() {
        error!("invalid configuration: {err}");
        std::process::exit(1);
    }

    let repository: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
    let store = Arc::new(SessionStore::new(repository.clone()));
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(PublishingAnalyticsSink::new(Arc::new(
        LoggingEventPublisher::new(),
    )));

    let planner = Arc::new(ConversationPlanner::new(
        Arc::new(TriageRuleTable::standard()),
        Arc::new(RandomPhraseSelector),
    ));

    let roster = match config.dispatch.roster_path() {
        Some(path) => match WorkerRoster::from_yaml_file(path) {
            Ok(roster) => roster,
            Err(err) => {
                error!(path, "failed to load health worker roster: {err}");
                std::process::exit(1);
            }
        },
        None => {
            warn!("no health worker roster configured, escalations use the hotline");
            WorkerRoster::empty()
        }
    };
    let roster = Arc::new(roster.with_assignment_ttl(config.dispatch.assignment_ttl()));
    info!(
        workers = roster.worker_count().await,
        assignment_ttl_secs = config.dispatch.assignment_ttl_secs,
        "health worker roster ready"
    );

    let delivery = Arc::new(
        OutboundDispatcher::new(
            DeliveryConfig::default()
                .with_max_attempts(config.delivery.max_attempts)
                .with_initial_backoff(config.delivery.initial_backoff()),
        )
        .with_adapter(Arc::new(LoggingChannelAdapter::new(Platform::Whatsapp)))
        .with_adapter(Arc::new(LoggingChannelAdapter::new(Platform::Sms)))
        .with_adapter(Arc::new(LoggingChannelAdapter::new(Platform::Ivr))),
    );

    let message_handler = Arc::new(
        HandleMessageHandler::new(
            store.clone(),
            planner,
            build_reply_generator(&config),
            Arc::new(InMemoryMedicalRecords::new()),
            roster.clone(),
            analytics.clone(),
        )
        .with_config(
            HandleMessageConfig::default()
                .with_turn_timeout(config.engine.turn_timeout())
                .with_reply_timeout(config.engine.reply_timeout())
                .with_emergency_hotline(config.engine.emergency_hotline.clone()),
        )
        .with_delivery(delivery),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::new(store, analytics).with_config(
        SweepConfig::default()
            .with_interval(config.engine.sweep_interval())
            .with_inactivity_timeout(config.engine.inactivity_timeout())
            .with_completion_cooldown(config.engine.completion_cooldown()),
    );
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let mut handlers = TriageHandlers::new(
        message_handler,
        Arc::new(GetSessionHandler::new(repository)),
    )
    .with_dispatch(roster);
    if let Some(secret) = config.channels.whatsapp_app_secret() {
        handlers = handlers.with_whatsapp_secret(secret);
    } else if config.is_production() {
        warn!("WhatsApp webhook signature verification is disabled");
    }

    let app = app_router(
        handlers,
        &config.server.allowed_origins(),
        config.server.request_timeout(),
        config.server.max_body_bytes,
    );

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            error!("invalid bind address: {err}");
            std::process::exit(1);
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, "failed to bind: {err}");
            std::process::exit(1);
        }
    };

    info!(
        environment = config.server.environment.as_str(),
        "health triage listening on {}",
        listener.local_addr().unwrap_or(addr)
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(err) = served {
        error!("server error: {err}");
    }

    let _ = shutdown_tx.send(true);
    if let Err(err) = sweeper_task.await {
        error!("session sweeper panicked: {err}");
    }
    info!("shutdown complete");
}

/// Templates only, or an OpenAI-compatible model with templates as fallback.
fn build_reply_generator(config: &AppConfig) -> Arc<dyn ReplyGenerator> {
    let templates: Arc<dyn ReplyGenerator> = Arc::new(TemplateReplyGenerator::new());

    let Some(api_key) = config.ai.api_key() else {
        info!("no AI key configured, using templated replies");
        return templates;
    };

    let openai_config = OpenAIReplyConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());

    match OpenAIReplyGenerator::new(openai_config) {
        Ok(openai) => {
            info!(model = %config.ai.model, "using AI replies with template fallback");
            Arc::new(FailoverReplyGenerator::new(Arc::new(openai)).with_fallback(templates))
        }
        Err(err) => {
            warn!("AI reply generator unavailable, using templates: {err}");
            templates
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
