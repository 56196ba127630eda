mod articles;
mod comments;
mod extract;
mod params;
mod response;
mod topics;
mod users;

use axum::{Router, http::header, response::IntoResponse, routing::get};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::instrument;

pub(crate) use self::{
    extract::{JsonBody, PathParam, QueryParams, parse_id, required},
    params::{ListParams, VoteDelta},
    response::Pretty,
};

use crate::{
    error::{ApiError, Error, Result},
    state::AppState,
};

/// 接口说明文档，编译期嵌入
pub const ENDPOINTS: &str = include_str!("../../resources/endpoints.json");

/// 设置应用的路由。
///
/// 将 `/api` 下的话题、用户、文章和评论接口组合在一起，并绑定应用状态。
/// 未匹配的路径返回 404，路径存在但方法不支持时返回 405。
pub fn setup_route(app: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/", get(endpoints).fallback(method_not_allowed))
                .merge(topics::setup_route())
                .merge(users::setup_route())
                .merge(articles::setup_route())
                .merge(comments::setup_route()),
        )
        .fallback(not_found)
        .with_state(app)
}

/// `GET /api`：返回接口说明文档
async fn endpoints() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], ENDPOINTS)
}

async fn not_found() -> Error {
    ApiError::NotFound("Not Found").into()
}

/// 路径存在但方法不支持
pub(crate) async fn method_not_allowed() -> Error {
    ApiError::MethodNotAllowed.into()
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
///
/// 在 `addr` 上监听 TCP 连接，收到退出信号后停止接收新请求并等待处理中的请求完成。
#[instrument(name = "http server", skip(router))]
pub async fn run_server_with_router(router: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志和追踪中间件
/// 3. 启动服务器
pub async fn run_server(app: AppState, addr: &str) -> Result<()> {
    let router = setup_route(app);
    let router = add_middlewares(router);
    run_server_with_router(router, addr).await
}

/// 为路由添加中间件，包括请求追踪和失败日志记录。
///
/// 日志记录会在请求失败时输出错误信息。
fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 关闭请求日志
            }),
    )
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(%e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(%e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_document_is_valid_json() {
        let doc: serde_json::Value = serde_json::from_str(ENDPOINTS).expect("endpoints.json");
        let routes = doc.as_object().expect("object");
        for route in [
            "GET /api",
            "GET /api/topics",
            "POST /api/topics",
            "GET /api/users",
            "GET /api/users/:username",
            "POST /api/users",
            "GET /api/articles",
            "POST /api/articles",
            "GET /api/articles/:article_id",
            "PATCH /api/articles/:article_id",
            "DELETE /api/articles/:article_id",
            "GET /api/articles/:article_id/comments",
            "POST /api/articles/:article_id/comments",
            "PATCH /api/comments/:comment_id",
            "DELETE /api/comments/:comment_id",
        ] {
            assert!(routes.contains_key(route), "{route}");
        }
    }
}
