use std::future::Future;

use super::{DBPool, NewTopic, Topic};

/// 话题的数据访问接口
pub trait TopicStorage: Send + Sync {
    /// 查询话题，可按 `slug` 过滤
    fn topics(
        &self,
        slug: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Topic>, sqlx::Error>> + Send;

    /// 判断话题是否存在
    fn topic_exists(&self, slug: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    /// 插入新话题，返回插入后的行
    fn insert_topic(
        &self,
        topic: &NewTopic,
    ) -> impl Future<Output = Result<Topic, sqlx::Error>> + Send;
}

impl TopicStorage for DBPool {
    async fn topics(&self, slug: Option<&str>) -> Result<Vec<Topic>, sqlx::Error> {
        sqlx::query_as::<_, Topic>(
            r#"
            SELECT slug, description
            FROM topics
            WHERE $1::VARCHAR IS NULL OR slug = $1
            ORDER BY slug
            "#,
        )
        .bind(slug)
        .fetch_all(self)
        .await
    }

    async fn topic_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM topics WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self)
            .await
    }

    async fn insert_topic(&self, topic: &NewTopic) -> Result<Topic, sqlx::Error> {
        sqlx::query_as::<_, Topic>(
            r#"
            INSERT INTO topics (slug, description)
            VALUES ($1, $2)
            RETURNING slug, description
            "#,
        )
        .bind(&topic.slug)
        .bind(&topic.description)
        .fetch_one(self)
        .await
    }
}
