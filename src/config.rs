use crate::error::{Error, Result};

/// 默认监听地址
pub const DEFAULT_ADDR: &str = "0.0.0.0:9090";

/// 默认最大连接数
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// 运行配置
///
/// 全部来自环境变量：
///
/// - `DATABASE_URL`：必填
/// - `NCNEWS_ADDR`：监听地址，默认 [`DEFAULT_ADDR`]
/// - `NCNEWS_DB_MAX_CONNECTIONS`：连接池最大连接数，默认 [`DEFAULT_MAX_CONNECTIONS`]
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: String,
    pub max_connections: u32,
}

impl Config {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过 `lookup` 读取配置项
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| Error::Config("`DATABASE_URL` not set".to_string()))?;

        let addr = lookup("NCNEWS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let max_connections = match lookup("NCNEWS_DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                Error::Config(format!("`NCNEWS_DB_MAX_CONNECTIONS` is invalid: {raw}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            addr,
            max_connections,
        })
    }
}
