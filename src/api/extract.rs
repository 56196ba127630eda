use axum::extract::{FromRequest, FromRequestParts};

use crate::error::{ApiError, Error};

/// JSON 请求体，解析失败时返回 JSON 格式的 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// 查询参数，解析失败时返回 JSON 格式的 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// 路径参数，解析失败时返回 JSON 格式的 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// 将路径中的 id 解析为整数，失败时返回 `msg` 对应的 400
pub fn parse_id(raw: &str, msg: &'static str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|_| ApiError::BadRequest(msg))
}

/// 必填的字符串字段，缺失或为空白时返回 400
pub fn required(field: Option<String>) -> Result<String, ApiError> {
    field
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::BadRequest(crate::error::BAD_REQUEST))
}
