use serde::Deserialize;

use crate::{
    error::{ApiError, BAD_REQUEST},
    storage::{ArticleFilter, Listing, Order, SortColumn},
};

/// 列表查询参数
///
/// 文章和评论共用，`author`/`topic` 只对文章列表有效。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub p: Option<i64>,
    pub author: Option<String>,
    pub topic: Option<String>,
}

impl ListParams {
    /// 解析排序与分页
    ///
    /// 排序列不在白名单内返回 400，`order` 非法时回退为降序。
    pub fn listing<S: SortColumn>(&self) -> Result<Listing<S>, ApiError> {
        let default = Listing::<S>::default();

        let sort = match self.sort_by.as_deref() {
            Some(column) => column
                .parse::<S>()
                .map_err(|_| ApiError::BadRequest("This Column Does Not Exist"))?,
            None => default.sort,
        };

        let limit = self.limit.unwrap_or(default.limit);
        if limit < 1 {
            return Err(ApiError::BadRequest("Bad Request - Invalid limit"));
        }

        let page = self.p.unwrap_or(default.page);
        if page < 1 {
            return Err(ApiError::BadRequest("Bad Request - Invalid p"));
        }

        Ok(Listing {
            sort,
            order: Order::parse_lenient(self.order.as_deref()),
            limit,
            page,
        })
    }

    /// 文章列表的过滤条件
    pub fn article_filter(&self) -> ArticleFilter<'_> {
        ArticleFilter {
            author: self.author.as_deref(),
            topic: self.topic.as_deref(),
        }
    }
}

const INVALID_INC_VOTES: &str = "Bad Request - Invalid Format For inc_votes";

/// 投票增量请求体
#[derive(Debug, Default, Deserialize)]
pub struct VoteDelta {
    #[serde(default)]
    inc_votes: serde_json::Value,
}

impl VoteDelta {
    fn parse(&self) -> Result<i64, ApiError> {
        match &self.inc_votes {
            serde_json::Value::Null => Ok(0),
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or(ApiError::BadRequest(INVALID_INC_VOTES)),
            _ => Err(ApiError::BadRequest(INVALID_INC_VOTES)),
        }
    }

    /// 任意整数增量，缺省为 0
    pub fn delta(&self) -> Result<i32, ApiError> {
        i32::try_from(self.parse()?).map_err(|_| ApiError::BadRequest(INVALID_INC_VOTES))
    }

    /// 单步增量，只允许 -1、0、1
    pub fn step(&self) -> Result<i32, ApiError> {
        match self.parse()? {
            step @ -1..=1 => Ok(step as i32),
            _ => Err(ApiError::BadRequest(BAD_REQUEST)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::{ArticleSort, CommentSort};

    fn vote(value: serde_json::Value) -> VoteDelta {
        serde_json::from_value(value).expect("vote body")
    }

    #[test]
    fn listing_defaults() {
        let listing = ListParams::default().listing::<ArticleSort>().expect("listing");
        assert_eq!(listing, Listing::default());
        assert_eq!(listing.sort, ArticleSort::CreatedAt);
        assert_eq!(listing.order, Order::Desc);
        assert_eq!(listing.limit, 10);
        assert_eq!(listing.page, 1);
    }

    #[test]
    fn listing_rejects_unknown_column() {
        let params = ListParams {
            sort_by: Some("not_a_column".into()),
            ..Default::default()
        };
        let err = params.listing::<ArticleSort>().unwrap_err();
        assert_eq!(err.to_string(), "This Column Does Not Exist");

        let params = ListParams {
            sort_by: Some("comment_count".into()),
            ..Default::default()
        };
        assert!(params.listing::<CommentSort>().is_err());
    }

    #[test]
    fn listing_rejects_non_positive_paging() {
        let params = ListParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(params.listing::<ArticleSort>().is_err());

        let params = ListParams {
            p: Some(0),
            ..Default::default()
        };
        assert!(params.listing::<ArticleSort>().is_err());
    }

    #[test]
    fn invalid_order_is_ignored() {
        let params = ListParams {
            sort_by: Some("votes".into()),
            order: Some("sideways".into()),
            ..Default::default()
        };
        let listing = params.listing::<ArticleSort>().expect("listing");
        assert_eq!(listing.sort, ArticleSort::Votes);
        assert_eq!(listing.order, Order::Desc);
    }

    #[test]
    fn vote_delta_accepts_signed_integers() {
        assert_eq!(vote(json!({ "inc_votes": 5 })).delta().ok(), Some(5));
        assert_eq!(vote(json!({ "inc_votes": -100 })).delta().ok(), Some(-100));
        assert_eq!(vote(json!({})).delta().ok(), Some(0));
        assert_eq!(vote(json!({ "inc_votes": null })).delta().ok(), Some(0));
    }

    #[test]
    fn vote_delta_rejects_non_integers() {
        for body in [
            json!({ "inc_votes": "five" }),
            json!({ "inc_votes": 1.5 }),
            json!({ "inc_votes": [1] }),
            json!({ "inc_votes": 4_000_000_000_i64 }),
        ] {
            let err = vote(body.clone()).delta().unwrap_err();
            assert_eq!(err.to_string(), INVALID_INC_VOTES, "{body}");
        }
    }

    #[test]
    fn vote_step_is_bounded() {
        assert_eq!(vote(json!({ "inc_votes": 1 })).step().ok(), Some(1));
        assert_eq!(vote(json!({ "inc_votes": -1 })).step().ok(), Some(-1));
        assert_eq!(vote(json!({})).step().ok(), Some(0));

        let err = vote(json!({ "inc_votes": 2 })).step().unwrap_err();
        assert_eq!(err.to_string(), BAD_REQUEST);

        let err = vote(json!({ "inc_votes": "up" })).step().unwrap_err();
        assert_eq!(err.to_string(), INVALID_INC_VOTES);
    }
}
