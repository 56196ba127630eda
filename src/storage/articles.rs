use std::future::Future;

use sqlx::{Postgres, QueryBuilder};

use super::{Article, ArticleSort, ArticleSummary, DBPool, Listing, NewArticle};

/// 文章列表的过滤条件
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleFilter<'a> {
    pub author: Option<&'a str>,
    pub topic: Option<&'a str>,
}

impl<'a> ArticleFilter<'a> {
    fn push_where(&self, builder: &mut QueryBuilder<'a, Postgres>) {
        builder.push(" WHERE TRUE");
        if let Some(author) = self.author {
            builder.push(" AND a.author = ").push_bind(author);
        }
        if let Some(topic) = self.topic {
            builder.push(" AND a.topic = ").push_bind(topic);
        }
    }
}

/// 文章的数据访问接口
pub trait ArticleStorage: Send + Sync {
    /// 查询单篇文章详情，附带评论数
    ///
    /// 文章不存在时返回 `None`。
    fn article(&self, id: i32) -> impl Future<Output = Result<Option<Article>, sqlx::Error>> + Send;

    /// 分页查询文章列表
    ///
    /// 返回 [`ArticleSummary`] 的向量，可按作者或话题过滤。
    fn articles(
        &self,
        filter: ArticleFilter<'_>,
        listing: Listing<ArticleSort>,
    ) -> impl Future<Output = Result<Vec<ArticleSummary>, sqlx::Error>> + Send;

    /// 统计满足过滤条件的文章总数（分页之前）
    fn count_articles(
        &self,
        filter: ArticleFilter<'_>,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// 在原有票数上增加 `delta`
    ///
    /// 文章不存在时返回 `None`。
    fn add_article_votes(
        &self,
        id: i32,
        delta: i32,
    ) -> impl Future<Output = Result<Option<Article>, sqlx::Error>> + Send;

    /// 插入新文章
    fn insert_article(
        &self,
        article: &NewArticle,
    ) -> impl Future<Output = Result<Article, sqlx::Error>> + Send;

    /// 删除文章，返回受影响的行数
    fn delete_article(&self, id: i32) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl ArticleStorage for DBPool {
    async fn article(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT a.article_id, a.title, a.body, a.votes, a.topic, a.author, a.created_at,
                   COUNT(c.comment_id) AS comment_count
            FROM articles a
            LEFT JOIN comments c ON c.article_id = a.article_id
            WHERE a.article_id = $1
            GROUP BY a.article_id
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn articles(
        &self,
        filter: ArticleFilter<'_>,
        listing: Listing<ArticleSort>,
    ) -> Result<Vec<ArticleSummary>, sqlx::Error> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT a.article_id, a.title, a.votes, a.topic, a.author, a.created_at,
                   COUNT(c.comment_id) AS comment_count
            FROM articles a
            LEFT JOIN comments c ON c.article_id = a.article_id
            "#,
        );

        filter.push_where(&mut builder);
        builder.push(" GROUP BY a.article_id");
        builder.push(listing.order_by("a.article_id"));
        builder.push(" LIMIT ").push_bind(listing.limit);
        builder.push(" OFFSET ").push_bind(listing.offset());

        builder
            .build_query_as::<ArticleSummary>()
            .fetch_all(self)
            .await
    }

    async fn count_articles(&self, filter: ArticleFilter<'_>) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM articles a");
        filter.push_where(&mut builder);

        builder.build_query_scalar::<i64>().fetch_one(self).await
    }

    async fn add_article_votes(&self, id: i32, delta: i32) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            WITH updated AS (
                UPDATE articles
                SET votes = votes + $1
                WHERE article_id = $2
                RETURNING *
            )
            SELECT u.article_id, u.title, u.body, u.votes, u.topic, u.author, u.created_at,
                   (SELECT COUNT(*) FROM comments c WHERE c.article_id = u.article_id) AS comment_count
            FROM updated u
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Article, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (author, topic, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING article_id, title, body, votes, topic, author, created_at,
                      0::BIGINT AS comment_count
            "#,
        )
        .bind(&article.author)
        .bind(&article.topic)
        .bind(&article.title)
        .bind(&article.body)
        .fetch_one(self)
        .await
    }

    async fn delete_article(&self, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE article_id = $1")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected())
    }
}
