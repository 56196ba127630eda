use std::future::Future;

use super::{DBPool, NewUser, User};

/// 用户的数据访问接口
pub trait UserStorage: Send + Sync {
    /// 查询全部用户
    fn users(&self) -> impl Future<Output = Result<Vec<User>, sqlx::Error>> + Send;

    /// 按用户名查询
    ///
    /// 用户不存在时返回 `None`。
    fn user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

    /// 判断用户是否存在
    fn user_exists(&self, username: &str)
    -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    /// 插入新用户
    fn insert_user(&self, user: &NewUser) -> impl Future<Output = Result<User, sqlx::Error>> + Send;
}

impl UserStorage for DBPool {
    async fn users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT username, name, avatar_url FROM users ORDER BY username")
            .fetch_all(self)
            .await
    }

    async fn user(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT username, name, avatar_url
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self)
        .await
    }

    async fn user_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(self)
            .await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, name, avatar_url)
            VALUES ($1, $2, $3)
            RETURNING username, name, avatar_url
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .fetch_one(self)
        .await
    }
}
