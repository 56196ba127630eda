use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use super::{
    ApiError, JsonBody, ListParams, PathParam, Pretty, QueryParams, Result, VoteDelta,
    method_not_allowed, parse_id, required,
};

use crate::{
    state::AppState,
    storage::{
        Article, ArticleSort, ArticleStorage, ArticleSummary, DBPool, NewArticle, TopicStorage,
        UserStorage,
    },
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /articles`：文章列表
/// - `POST /articles`：新建文章
/// - `GET /articles/{article_id}`：获取单篇文章
/// - `PATCH /articles/{article_id}`：修改票数
/// - `DELETE /articles/{article_id}`：删除文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route(
            "/articles",
            get(article_list)
                .post(create_article)
                .fallback(method_not_allowed),
        )
        .route(
            "/articles/{article_id}",
            get(article)
                .patch(update_votes)
                .delete(delete_article)
                .fallback(method_not_allowed),
        )
}

/// 路径中 id 不是整数时的提示
pub const INVALID_INPUT_SYNTAX: &str = "Invalid Input Syntax";

#[derive(Debug, Serialize)]
struct ArticleBody {
    article: Article,
}

#[derive(Debug, Serialize)]
struct ArticlesBody {
    articles: Vec<ArticleSummary>,
    total_count: i64,
}

/// 根据 id 获取单篇文章。
///
/// 供评论列表复用，以确认文章存在。
pub(super) async fn find_article(pool: &DBPool, raw_id: &str) -> Result<Article> {
    let id = parse_id(raw_id, INVALID_INPUT_SYNTAX)?;

    pool.article(id)
        .await?
        .ok_or(ApiError::NotFound("No Such Article").into())
}

/// 获取单篇文章，包含正文和评论数。
async fn article(
    PathParam(article_id): PathParam<String>,
    State(pool): State<DBPool>,
) -> Result<Pretty<ArticleBody>> {
    let article = find_article(&pool, &article_id).await?;
    Ok(Pretty(ArticleBody { article }))
}

/// 获取文章列表。
///
/// 支持排序、分页、作者和话题过滤，返回的列表项不含正文。
/// 作者或话题本身不存在时返回 404；存在但没有文章时返回空列表。
async fn article_list(
    QueryParams(params): QueryParams<ListParams>,
    State(pool): State<DBPool>,
) -> Result<Pretty<ArticlesBody>> {
    let listing = params.listing::<ArticleSort>()?;
    let filter = params.article_filter();

    if let Some(author) = filter.author {
        if !pool.user_exists(author).await? {
            return Err(ApiError::NotFound("No Such User").into());
        }
    }
    if let Some(topic) = filter.topic {
        if !pool.topic_exists(topic).await? {
            return Err(ApiError::NotFound("Topic Not Found").into());
        }
    }

    let articles = pool.articles(filter, listing).await?;
    let total_count = pool.count_articles(filter).await?;

    Ok(Pretty(ArticlesBody {
        articles,
        total_count,
    }))
}

/// 修改文章票数。
///
/// `inc_votes` 可正可负，缺省时票数不变。
async fn update_votes(
    PathParam(article_id): PathParam<String>,
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<VoteDelta>,
) -> Result<Pretty<ArticleBody>> {
    let id = parse_id(&article_id, INVALID_INPUT_SYNTAX)?;
    let delta = body.delta()?;

    let article = pool
        .add_article_votes(id, delta)
        .await?
        .ok_or(ApiError::NotFound("No Such Article - Unable To Patch"))?;

    Ok(Pretty(ArticleBody { article }))
}

#[derive(Debug, Deserialize)]
struct CreateArticle {
    author: Option<String>,
    topic: Option<String>,
    title: Option<String>,
    body: Option<String>,
}

/// 新建文章。
///
/// 作者或话题不存在时由外键约束报错，翻译为 400。
async fn create_article(
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<CreateArticle>,
) -> Result<(StatusCode, Pretty<ArticleBody>)> {
    let article = NewArticle {
        author: required(body.author)?,
        topic: required(body.topic)?,
        title: required(body.title)?,
        body: required(body.body)?,
    };

    let article = pool.insert_article(&article).await?;
    tracing::info!(article_id = article.article_id, "article created");

    Ok((StatusCode::CREATED, Pretty(ArticleBody { article })))
}

/// 删除文章，其下评论由数据库级联删除。
async fn delete_article(
    PathParam(article_id): PathParam<String>,
    State(pool): State<DBPool>,
) -> Result<StatusCode> {
    let id = parse_id(&article_id, "Bad Request - Malformed article_id")?;

    match pool.delete_article(id).await? {
        0 => Err(ApiError::NotFound("No Article Found, Nothing To Delete").into()),
        _ => {
            tracing::info!(article_id = id, "article deleted");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
