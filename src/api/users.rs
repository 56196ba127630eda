use std::sync::LazyLock;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ApiError, JsonBody, PathParam, Pretty, Result, method_not_allowed, required};

use crate::{
    state::AppState,
    storage::{DBPool, NewUser, User, UserStorage},
};

/// 配置用户相关路由。
///
/// - `GET /users`：用户列表
/// - `POST /users`：新建用户
/// - `GET /users/{username}`：获取单个用户
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(user_list).post(create_user).fallback(method_not_allowed),
        )
        .route("/users/{username}", get(user).fallback(method_not_allowed))
}

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]{3,30}$").expect("username pattern"));

const INVALID_USERNAME: &str = "Invalid Username - Must contain 3 to 30 lowercase alphanumeric, underscore, or hyphen characters only.";

/// 校验用户名格式
pub fn validate_username(username: &str) -> std::result::Result<(), ApiError> {
    if USERNAME.is_match(username) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(INVALID_USERNAME))
    }
}

#[derive(Debug, Serialize)]
struct UsersBody {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
struct UserBody {
    user: User,
}

/// 获取全部用户。
async fn user_list(State(pool): State<DBPool>) -> Result<Pretty<UsersBody>> {
    let users = pool.users().await?;
    Ok(Pretty(UsersBody { users }))
}

/// 根据用户名获取单个用户。
///
/// 用户名格式不合法时不访问数据库，直接返回 400。
async fn user(
    PathParam(username): PathParam<String>,
    State(pool): State<DBPool>,
) -> Result<Pretty<UserBody>> {
    validate_username(&username)?;

    let user = pool
        .user(&username)
        .await?
        .ok_or(ApiError::NotFound("No Such User"))?;

    Ok(Pretty(UserBody { user }))
}

#[derive(Debug, Deserialize)]
struct CreateUser {
    username: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// 新建用户。
async fn create_user(
    State(pool): State<DBPool>,
    JsonBody(body): JsonBody<CreateUser>,
) -> Result<(StatusCode, Pretty<UserBody>)> {
    let username = required(body.username)?;
    validate_username(&username)?;

    let user = NewUser {
        username,
        name: required(body.name)?,
        avatar_url: body.avatar_url,
    };

    let user = pool.insert_user(&user).await?;
    tracing::info!(username = %user.username, "user created");

    Ok((StatusCode::CREATED, Pretty(UserBody { user })))
}
