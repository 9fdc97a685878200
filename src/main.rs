use timage::{app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "timage=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;

    let pool = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(url, &config).await?;
            db::migrate(&pool).await;
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            None
        }
    };

    let state = match &pool {
        Some(pool) => AppState::postgres(pool.clone()),
        None => AppState::in_memory(),
    };

    app::serve(app::build_app(state), addr).await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }
    Ok(())
}
