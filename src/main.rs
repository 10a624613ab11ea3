use carbon_iq::api::routes::create_routes;
use carbon_iq::config::{run_migrations, AnalyticsConfig, AppConfig, DatabaseConfig, DatabaseSeeder};
use carbon_iq::services::EmissionAnalyzer;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let analytics = AnalyticsConfig::from_env()?;
    let database = DatabaseConfig::from_env()?;
    let pool = database.create_pool().await?;
    run_migrations(&pool).await?;

    if config.seed_demo_data {
        DatabaseSeeder::new(pool.clone(), EmissionAnalyzer::new(analytics)).seed_all().await?;
    }

    let app = create_routes(pool, &config.jwt_secret, analytics);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("CarbonIQ API ({}) starting on http://{}", config.environment, address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
