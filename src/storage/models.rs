use chrono::{DateTime, Utc};
use serde::Serialize;

/// 话题
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Topic {
    /// 唯一标识
    pub slug: String,
    pub description: String,
}

/// 用户
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// 唯一用户名
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// 文章详情
///
/// 包含正文以及评论数 `comment_count`。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub body: String,
    pub votes: i32,
    /// 所属话题，参见 [`Topic`]
    pub topic: String,
    /// 作者用户名，参见 [`User`]
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// 文章列表项
///
/// 与 [`Article`] 相同，但不包含正文。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ArticleSummary {
    pub article_id: i32,
    pub title: String,
    pub votes: i32,
    pub topic: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// 评论
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i32,
    pub article_id: i32,
    pub author: String,
    pub body: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

/// 新建话题所需字段
#[derive(Debug)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
}

/// 新建用户所需字段
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// 新建文章所需字段
#[derive(Debug)]
pub struct NewArticle {
    pub author: String,
    pub topic: String,
    pub title: String,
    pub body: String,
}

/// 新建评论所需字段
#[derive(Debug)]
pub struct NewComment {
    pub author: String,
    pub body: String,
}
