use std::future::Future;

use sqlx::QueryBuilder;

use super::{Comment, CommentSort, DBPool, Listing, NewComment};

/// 评论的数据访问接口
pub trait CommentStorage: Send + Sync {
    /// 分页查询某篇文章下的评论
    fn comments(
        &self,
        article_id: i32,
        listing: Listing<CommentSort>,
    ) -> impl Future<Output = Result<Vec<Comment>, sqlx::Error>> + Send;

    /// 统计某篇文章下的评论总数
    fn count_comments(&self, article_id: i32)
    -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// 在文章下插入评论
    ///
    /// 不会预先检查文章是否存在，由外键约束保证。
    fn insert_comment(
        &self,
        article_id: i32,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment, sqlx::Error>> + Send;

    /// 在原有票数上增加 `delta`
    ///
    /// 评论不存在时返回 `None`。
    fn add_comment_votes(
        &self,
        id: i32,
        delta: i32,
    ) -> impl Future<Output = Result<Option<Comment>, sqlx::Error>> + Send;

    /// 删除评论，返回受影响的行数
    fn delete_comment(&self, id: i32) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl CommentStorage for DBPool {
    async fn comments(
        &self,
        article_id: i32,
        listing: Listing<CommentSort>,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT comment_id, article_id, author, body, votes, created_at
            FROM comments
            WHERE article_id =
            "#,
        );
        builder.push_bind(article_id);
        builder.push(listing.order_by("comment_id"));
        builder.push(" LIMIT ").push_bind(listing.limit);
        builder.push(" OFFSET ").push_bind(listing.offset());

        builder.build_query_as::<Comment>().fetch_all(self).await
    }

    async fn count_comments(&self, article_id: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE article_id = $1")
            .bind(article_id)
            .fetch_one(self)
            .await
    }

    async fn insert_comment(
        &self,
        article_id: i32,
        comment: &NewComment,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (article_id, author, body)
            VALUES ($1, $2, $3)
            RETURNING comment_id, article_id, author, body, votes, created_at
            "#,
        )
        .bind(article_id)
        .bind(&comment.author)
        .bind(&comment.body)
        .fetch_one(self)
        .await
    }

    async fn add_comment_votes(&self, id: i32, delta: i32) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET votes = votes + $1
            WHERE comment_id = $2
            RETURNING comment_id, article_id, author, body, votes, created_at
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn delete_comment(&self, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected())
    }
}
