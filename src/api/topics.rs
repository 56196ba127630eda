use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use super::{ApiError, JsonBody, Pretty, QueryParams, Result, method_not_allowed, required};

use crate::{
    state::AppState,
    storage::{DBPool, NewTopic, Topic, TopicStorage},
};

/// 配置话题相关路由。
///
/// - `GET /topics`：话题列表，可按 `slug` 过滤
/// - `POST /topics`：新建话题
pub fn setup_route() -> Router<AppState> {
    Router::new().route(
        "/topics",
        get(topic_list)
            .post(create_topic)
            .fallback(method_not_allowed),
    )
}

#[derive(Debug, Serialize)]
struct TopicsBody {
    topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
struct TopicBody {
    topic: Topic,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TopicQuery {
    slug: Option<String>,
}

/// 获取话题列表。
///
/// 带 `slug` 过滤且没有匹配项时返回 404。
async fn topic_list(
    QueryParams(query): QueryParams<TopicQuery>,
    State(pool): State<DBPool>,
) -> Result<Pretty<TopicsBody>> {
    let topics = pool.topics(query.slug.as_deref()).await?;

    if query.slug.is_some() && topics.is_empty() {
        return Err(ApiError::NotFound("Topic Not Found").into());
    }

    Ok(Pretty(TopicsBody { topics }))
}

#[derive(Debug, Deserialize)]
struct CreateTopic {
    slug: Option<String>,
    description: Option<String>,
}

/// 新建话题。
async fn create_topic(
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<CreateTopic>,
) -> Result<(StatusCode, Pretty<TopicBody>)> {
    let topic = NewTopic {
        slug: required(body.slug)?,
        description: required(body.description)?,
    };

    let topic = pool.insert_topic(&topic).await?;
    tracing::info!(slug = %topic.slug, "topic created");

    Ok((StatusCode::CREATED, Pretty(TopicBody { topic })))
}
