use std::sync::Arc;

use zeno_api::{build_router, config::Config, db, AppState};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .json()
        .init();

    let pool = db::create_pool(&config).await;
    db::run_migrations(&pool).await;

    let port = config.port;
    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind server port");

    tracing::info!("Zeno rewards API listening on port {port}");

    axum::serve(listener, router)
        .await
        .expect("Server error");
}
