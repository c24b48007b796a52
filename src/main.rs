use bookr::config::Config;
use bookr::migration::Migrator;
use bookr::routes::{self, AppState};
use bookr::seed;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookr=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    if config.seed {
        seed::run(&db).await?;
    }

    let app = routes::router(AppState::new(db, config.serializer).with_debug(config.debug));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        serializer = ?config.serializer,
        debug = config.debug,
        "bookr listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
