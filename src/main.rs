// region:    --- Imports
use listing_auction::clock::{Clock, SystemClock};
use listing_auction::config::Config;
use listing_auction::database::{DatabaseManager, PostgresListingStore};
use listing_auction::handlers::{self, AppState};
use listing_auction::store::{ListingStore, MemoryListingStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 저장소 생성 (DATABASE_URL이 없으면 메모리 저장소)
    let store: Arc<dyn ListingStore> = match &config.database_url {
        Some(url) => {
            let db_manager =
                Arc::new(DatabaseManager::new(url, config.database_max_connections).await?);
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresListingStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 없음: 메모리 저장소 사용",
                "Main"
            );
            Arc::new(MemoryListingStore::new(Arc::clone(&clock)))
        }
    };

    let state = AppState::new(store, clock, config.bidding);
    let routes_all = handlers::router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> 종료 신호 대기 실패: {:?}", "Main", e);
        std::future::pending::<()>().await;
    }
    info!("{:<12} --> 종료 신호 수신", "Main");
}
// endregion: --- Main
