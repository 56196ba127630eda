use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};

use super::{
    ApiError, JsonBody, ListParams, PathParam, Pretty, QueryParams, Result, VoteDelta,
    articles::{INVALID_INPUT_SYNTAX, find_article},
    method_not_allowed, parse_id, required,
};

use crate::{
    state::AppState,
    storage::{Comment, CommentSort, CommentStorage, DBPool, NewComment},
};

/// 配置评论相关路由。
///
/// - `GET /articles/{article_id}/comments`：文章下的评论列表
/// - `POST /articles/{article_id}/comments`：发表评论
/// - `PATCH /comments/{comment_id}`：修改票数
/// - `DELETE /comments/{comment_id}`：删除评论
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route(
            "/articles/{article_id}/comments",
            get(comment_list)
                .post(create_comment)
                .fallback(method_not_allowed),
        )
        .route(
            "/comments/{comment_id}",
            patch(update_votes)
                .delete(delete_comment)
                .fallback(method_not_allowed),
        )
}

const MALFORMED_COMMENT_ID: &str = "Bad Request - Malformed comment_id";

#[derive(Debug, Serialize)]
struct CommentBody {
    comment: Comment,
}

#[derive(Debug, Serialize)]
struct CommentsBody {
    comments: Vec<Comment>,
    total_count: i64,
}

/// 获取文章下的评论列表。
///
/// 先确认文章存在，排序与分页规则同文章列表。
async fn comment_list(
    PathParam(article_id): PathParam<String>,
    QueryParams(params): QueryParams<ListParams>,
    State(pool): State<DBPool>,
) -> Result<Pretty<CommentsBody>> {
    let article = find_article(&pool, &article_id).await?;
    let listing = params.listing::<CommentSort>()?;

    let comments = pool.comments(article.article_id, listing).await?;
    let total_count = pool.count_comments(article.article_id).await?;

    Ok(Pretty(CommentsBody {
        comments,
        total_count,
    }))
}

#[derive(Debug, Deserialize)]
struct CreateComment {
    username: Option<String>,
    body: Option<String>,
}

/// 在文章下发表评论。
///
/// 不预先检查文章是否存在，文章或用户不存在时由外键约束报错。
async fn create_comment(
    PathParam(article_id): PathParam<String>,
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<CreateComment>,
) -> Result<(StatusCode, Pretty<CommentBody>)> {
    let article_id = parse_id(&article_id, INVALID_INPUT_SYNTAX)?;
    let comment = NewComment {
        author: required(body.username)?,
        body: required(body.body)?,
    };

    let comment = pool.insert_comment(article_id, &comment).await?;
    tracing::info!(comment_id = comment.comment_id, article_id, "comment created");

    Ok((StatusCode::CREATED, Pretty(CommentBody { comment })))
}

/// 修改评论票数，每次只能 +1、-1 或不变。
async fn update_votes(
    PathParam(comment_id): PathParam<String>,
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<VoteDelta>,
) -> Result<Pretty<CommentBody>> {
    let id = parse_id(&comment_id, MALFORMED_COMMENT_ID)?;
    let step = body.step()?;

    let comment = pool
        .add_comment_votes(id, step)
        .await?
        .ok_or(ApiError::NotFound("No Comment Found, Nothing To Patch"))?;

    Ok(Pretty(CommentBody { comment }))
}

/// 删除评论。
async fn delete_comment(
    PathParam(comment_id): PathParam<String>,
    State(pool): State<DBPool>,
) -> Result<StatusCode> {
    let id = parse_id(&comment_id, MALFORMED_COMMENT_ID)?;

    match pool.delete_comment(id).await? {
        0 => Err(ApiError::NotFound("No Comment Found, Nothing To Delete").into()),
        _ => {
            tracing::info!(comment_id = id, "comment deleted");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
