#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode, header},
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};
use tower::util::ServiceExt;

use ncnews::{
    api,
    config::Config,
    state::AppState,
    storage::{DBPool, migrate, new_db_pool},
};

/// 数据库测试共用一个库，需要串行执行
static DB_LOCK: Mutex<()> = Mutex::const_new(());

pub struct TestApp {
    router: Router,
    pool: DBPool,
    _guard: Option<MutexGuard<'static, ()>>,
}

impl TestApp {
    /// 连接真实数据库，并重新建表、灌入测试数据
    pub async fn seeded() -> Self {
        let guard = DB_LOCK.lock().await;
        dotenvy::dotenv().ok();

        let config = Config::from_env().expect("读取配置失败");
        let pool = new_db_pool(&config.database_url, 2)
            .await
            .expect("连接数据库失败");

        migrate(&pool, "sql/01-CREATE_TABLE.sql")
            .await
            .expect("初始化sql失败");
        migrate(&pool, "sql/02-SEED.sql")
            .await
            .expect("灌入测试数据失败");

        Self {
            router: api::setup_route(AppState::new(pool.clone())),
            pool,
            _guard: Some(guard),
        }
    }

    /// 不会真正连接的数据库，用于不访问数据库的路由测试
    pub fn offline() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://ncnews@127.0.0.1:1/ncnews_offline")
            .expect("lazy pool");

        Self {
            router: api::setup_route(AppState::new(pool.clone())),
            pool,
            _guard: None,
        }
    }

    pub fn pool(&self) -> &DBPool {
        &self.pool
    }

    /// 发送请求，返回原始响应
    pub async fn response(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    /// 发送请求，返回状态码和 JSON 响应体（无响应体时为 `Value::Null`）
    pub async fn request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.response(req).await;

        let status = resp.status();
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");

        if data.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice(&data).expect("反序列化失败");
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).expect("请求失败");
        self.request(req).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::delete(uri).body(Body::empty()).expect("请求失败");
        self.request(req).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, body).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("PATCH", uri, body).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::new(body.to_string()))
            .expect("请求失败");
        self.request(req).await
    }
}

/// 取出 `{msg}` 错误信息
pub fn msg(body: &Value) -> &str {
    body["msg"].as_str().expect("错误响应应包含 msg")
}
