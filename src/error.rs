use std::io;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use serde::Serialize;

use crate::api::Pretty;

pub type Result<T> = core::result::Result<T, Error>;

/// 通用的 400 提示
pub const BAD_REQUEST: &str = "Bad Request";

/// 返回给客户端的业务错误，消息即响应体中的 `msg`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// 内部错误，详情只写日志
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 将 PostgreSQL 错误码翻译为业务错误
    ///
    /// 未收录的错误码返回 422，并原样带出数据库的消息。
    pub fn from_pg_code(code: &str, message: &str) -> Self {
        match code {
            "22P02" => ApiError::BadRequest("Invalid Input Syntax"),
            "23502" | "23503" => ApiError::BadRequest(BAD_REQUEST),
            "23505" => ApiError::Conflict("Already Exists"),
            "42703" => ApiError::BadRequest("This Column Does Not Exist"),
            "42P01" => ApiError::BadRequest("Relation Does Not Exist"),
            _ => {
                tracing::warn!(code, message, "unmapped database error");
                ApiError::Unprocessable(message.to_string())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// 转换为返回给客户端的错误
    pub fn into_api_error(self) -> ApiError {
        match self {
            Error::Api(e) => e,
            Error::Sqlx(sqlx::Error::Database(e)) => match e.code() {
                Some(code) => ApiError::from_pg_code(&code, e.message()),
                None => ApiError::Internal(e.to_string()),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(_: JsonRejection) -> Self {
        ApiError::BadRequest(BAD_REQUEST).into()
    }
}

impl From<QueryRejection> for Error {
    fn from(_: QueryRejection) -> Self {
        ApiError::BadRequest(BAD_REQUEST).into()
    }
}

impl From<PathRejection> for Error {
    fn from(_: PathRejection) -> Self {
        ApiError::BadRequest(BAD_REQUEST).into()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    msg: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            tracing::error!(%e, "internal error");
        }

        let body = ErrorBody {
            msg: self.to_string(),
        };
        (self.status(), Pretty(body)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, fmt};

    use axum::body::to_bytes;
    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct PgError {
        code: Option<&'static str>,
        message: &'static str,
    }

    impl fmt::Display for PgError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl std::error::Error for PgError {}

    impl DatabaseError for PgError {
        fn message(&self) -> &str {
            self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn db_error(code: Option<&'static str>, message: &'static str) -> Error {
        sqlx::Error::Database(Box::new(PgError { code, message })).into()
    }

    async fn render(err: Error) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        (status, String::from_utf8(data.to_vec()).expect("utf8"))
    }

    #[test]
    fn pg_codes_are_translated() {
        let cases = [
            ("22P02", StatusCode::BAD_REQUEST, "Invalid Input Syntax"),
            ("23502", StatusCode::BAD_REQUEST, "Bad Request"),
            ("23503", StatusCode::BAD_REQUEST, "Bad Request"),
            ("23505", StatusCode::CONFLICT, "Already Exists"),
            ("42703", StatusCode::BAD_REQUEST, "This Column Does Not Exist"),
            ("42P01", StatusCode::BAD_REQUEST, "Relation Does Not Exist"),
        ];
        for (code, status, msg) in cases {
            let err = db_error(Some(code), "raw message").into_api_error();
            assert_eq!(err.status(), status, "{code}");
            assert_eq!(err.to_string(), msg, "{code}");
        }
    }

    #[test]
    fn unmapped_pg_code_keeps_raw_message() {
        let err = db_error(Some("23514"), "new row violates check constraint").into_api_error();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "new row violates check constraint");
    }

    #[test]
    fn other_errors_are_internal() {
        let err = db_error(None, "no code").into_api_error();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = Error::Sqlx(sqlx::Error::PoolTimedOut).into_api_error();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal Server Error");

        let err = Error::from(io::Error::other("disk")).into_api_error();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = Error::Config("missing".into()).into_api_error();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn api_errors_pass_through() {
        let err = Error::from(ApiError::NotFound("No Such Article")).into_api_error();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No Such Article");

        let err = Error::from(ApiError::MethodNotAllowed).into_api_error();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.to_string(), "Method Not Allowed");
    }

    #[tokio::test]
    async fn responses_carry_pretty_msg_body() {
        let (status, body) = render(db_error(Some("22P02"), "invalid input")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "{\n  \"msg\": \"Invalid Input Syntax\"\n}");

        let (status, body) = render(db_error(Some("XX000"), "boom")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "{\n  \"msg\": \"boom\"\n}");

        let (status, body) = render(Error::Sqlx(sqlx::Error::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "{\n  \"msg\": \"Internal Server Error\"\n}");
    }
}
