use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use board_service::config::{Config, CorsConfig, SERVICE_NAME};
use board_service::db::{InMemoryStore, PgStore, Store};
use board_service::{configure_routes, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        config
            .origins()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database {
        Some(db_config) => {
            db_config.log_config();
            let pool = db_pool::create_pool(db_config)
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Database migrations completed");

            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        service = SERVICE_NAME,
        env = %config.app.env,
        version = env!("CARGO_PKG_VERSION"),
        "Starting board-service"
    );

    let tokens = Arc::new(config.auth.token_service()?);
    let store = build_store(&config).await?;
    let state = web::Data::new(AppState::new(store, tokens));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!(address = %bind_address, "Starting HTTP server");

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&cors_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    info!("board-service stopped");
    Ok(())
}
