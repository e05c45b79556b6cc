use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use landmatch::config::{LoggingSettings, Settings};
use landmatch::core::Matcher;
use landmatch::presenter::MatchPresenter;
use landmatch::routes::{self, AppState};
use landmatch::services::{CacheManager, CrmClient, PostgresClient};

fn init_tracing(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // tracing needs the logging section, so report config errors after init
    let loaded = Settings::load();
    match &loaded {
        Ok(settings) => init_tracing(&settings.logging),
        Err(_) => init_tracing(&LoggingSettings::default()),
    }

    info!("Starting landmatch service...");

    let settings = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::other(format!("Configuration error: {}", e))
    })?;

    let cache = CacheManager::from_settings(&settings.cache).await.map_err(|e| {
        error!("Failed to connect to Redis: {}", e);
        io::Error::other("Redis connection required")
    })?;

    let postgres = PostgresClient::from_settings(&settings.database).await.map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        io::Error::other(format!("PostgreSQL connection error: {}", e))
    })?;

    let crm = match &settings.crm {
        Some(crm_settings) if !crm_settings.api_token.is_empty() => {
            let client = CrmClient::new(crm_settings).map_err(|e| io::Error::other(e.to_string()))?;
            info!("CRM sync enabled ({})", crm_settings.base_url);
            Some(Arc::new(client))
        }
        Some(_) => {
            warn!("CRM section present without an API token, CRM sync disabled");
            None
        }
        None => None,
    };

    let matcher = Matcher::new(settings.matching.parallel_threshold);
    info!(
        "Matcher initialized (parallel scan from {} candidates)",
        settings.matching.parallel_threshold
    );

    let app_state = AppState {
        postgres: Arc::new(postgres),
        cache: Arc::new(cache),
        crm,
        matcher,
        presenter: MatchPresenter::default(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
