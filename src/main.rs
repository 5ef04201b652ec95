//! # vcups 웹훅 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행 (스키마 + 메뉴)
//! 5. 세션 저장소, 게이트웨이, 워크플로우 조립
//! 6. 방치된 초안 정리 작업 시작
//! 7. HTTP 서버 시작

use std::sync::Arc;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vcups::{
    config::Config,
    db::SqliteGateway,
    routes::{self, AppState},
    services::{InMemorySessionStore, OrderWorkflow, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG 환경변수가 없으면 vcups, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vcups=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting vcups webhook on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 워크플로우 조립 ──
    // 세션 저장소와 게이트웨이는 트레이트 객체로 주입합니다.
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let workflow = Arc::new(OrderWorkflow::new(
        sessions.clone(),
        Arc::new(SqliteGateway::new(pool.clone())),
        config.gateway_timeout,
    ));

    // ── 7단계: 방치된 초안 정리 작업 ──
    // 대화가 중간에 끊긴 세션의 초안은 아무도 꺼내지 않으므로 주기적으로 지웁니다.
    match config.session_ttl {
        Some(ttl) => {
            // chrono 범위를 넘는 TTL은 사실상 무기한으로 취급
            let max_idle = chrono::Duration::from_std(ttl)
                .unwrap_or_else(|_| chrono::Duration::days(365 * 1000));
            let mut ticker = tokio::time::interval(config.reap_interval);
            tokio::spawn(async move {
                loop {
                    ticker.tick().await;
                    let reaped = sessions.reap_idle(chrono::Utc::now(), max_idle).await;
                    if reaped > 0 {
                        tracing::info!("Reaped {} idle session drafts", reaped);
                    }
                }
            });
        }
        None => tracing::warn!("SESSION_TTL_MINUTES=0, idle session drafts are never reaped"),
    }

    // ── 8단계: 서버 시작 ──
    let app = routes::router(AppState { workflow });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
