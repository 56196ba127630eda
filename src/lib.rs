pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Config;
use error::Result;
use state::AppState;

/// 启动服务
///
/// 初始化日志、读取配置、建立连接池并运行 HTTP 服务，
/// 服务优雅退出后关闭连接池。
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("NCNEWS_LOG"))
        .init();

    let config = Config::from_env()?;
    let pool = storage::new_db_pool(&config.database_url, config.max_connections).await?;

    let result = api::run_server(AppState::new(pool.clone()), &config.addr).await;

    pool.close().await;
    tracing::info!("database pool closed");

    result
}
