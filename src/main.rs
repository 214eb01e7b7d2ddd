use std::sync::Arc;
use taskboard_api::infrastructure::config::{Config, LogFormat};
use taskboard_api::infrastructure::db::{check_connection, create_pool, run_migrations};
use taskboard_api::infrastructure::http::{create_app, start_http_server};
use taskboard_api::infrastructure::repositories::{
    InMemoryTaskRepository, PgTaskRepository, TaskRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Taskboard API on {}:{}",
        config.host,
        config.port
    );

    let task_repo: Arc<dyn TaskRepository> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgTaskRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, tasks are kept in memory and lost on restart");
            Arc::new(InMemoryTaskRepository::new())
        }
    };

    let app = create_app(&config, task_repo);

    start_http_server(&config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
