use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coreadability_api::{
    config::Config,
    db,
    routes::{create_router, AppState},
    services::recommendations::RecommendationService,
    stores::postgres::PgStores,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coreadability_api=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let stores = Arc::new(PgStores::new(pool));

    let state = AppState {
        recommendations: Arc::new(RecommendationService::new(
            stores.clone(),
            stores.clone(),
            stores.clone(),
            stores.clone(),
            stores,
        )),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "coreadability-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
