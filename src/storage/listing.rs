use std::{fmt, str::FromStr};

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    /// 宽松解析：无法识别的值回退为默认的 [`Order::Desc`]
    pub fn parse_lenient(raw: Option<&str>) -> Order {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => Order::Asc,
            _ => Order::Desc,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("ASC"),
            Order::Desc => f.write_str("DESC"),
        }
    }
}

/// 不存在的排序列
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownColumn;

/// 可排序的列
///
/// `column` 返回的是写死的 SQL 片段，只有白名单内的列才能拼进查询。
pub trait SortColumn: Copy + Default + FromStr<Err = UnknownColumn> {
    fn column(self) -> &'static str;
}

/// 文章列表的排序列
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleSort {
    ArticleId,
    Title,
    Topic,
    Author,
    Body,
    Votes,
    #[default]
    CreatedAt,
    CommentCount,
}

impl FromStr for ArticleSort {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "article_id" => ArticleSort::ArticleId,
            "title" => ArticleSort::Title,
            "topic" => ArticleSort::Topic,
            "author" => ArticleSort::Author,
            "body" => ArticleSort::Body,
            "votes" => ArticleSort::Votes,
            "created_at" => ArticleSort::CreatedAt,
            "comment_count" => ArticleSort::CommentCount,
            _ => return Err(UnknownColumn),
        })
    }
}

impl SortColumn for ArticleSort {
    fn column(self) -> &'static str {
        match self {
            ArticleSort::ArticleId => "a.article_id",
            ArticleSort::Title => "a.title",
            ArticleSort::Topic => "a.topic",
            ArticleSort::Author => "a.author",
            ArticleSort::Body => "a.body",
            ArticleSort::Votes => "a.votes",
            ArticleSort::CreatedAt => "a.created_at",
            ArticleSort::CommentCount => "comment_count",
        }
    }
}

/// 评论列表的排序列
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentSort {
    CommentId,
    Author,
    Body,
    Votes,
    #[default]
    CreatedAt,
}

impl FromStr for CommentSort {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "comment_id" => CommentSort::CommentId,
            "author" => CommentSort::Author,
            "body" => CommentSort::Body,
            "votes" => CommentSort::Votes,
            "created_at" => CommentSort::CreatedAt,
            _ => return Err(UnknownColumn),
        })
    }
}

impl SortColumn for CommentSort {
    fn column(self) -> &'static str {
        match self {
            CommentSort::CommentId => "comment_id",
            CommentSort::Author => "author",
            CommentSort::Body => "body",
            CommentSort::Votes => "votes",
            CommentSort::CreatedAt => "created_at",
        }
    }
}

/// 列表查询的排序与分页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing<S> {
    pub sort: S,
    pub order: Order,
    pub limit: i64,
    /// 从 1 开始的页码
    pub page: i64,
}

impl<S: SortColumn> Default for Listing<S> {
    fn default() -> Self {
        Self {
            sort: S::default(),
            order: Order::default(),
            limit: 10,
            page: 1,
        }
    }
}

impl<S> Listing<S> {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }
}

impl<S: SortColumn> Listing<S> {
    /// `ORDER BY` 子句，同值时按 `tie_breaker` 同方向排序
    pub fn order_by(&self, tie_breaker: &str) -> String {
        format!(
            " ORDER BY {} {}, {} {}",
            self.sort.column(),
            self.order,
            tie_breaker,
            self.order
        )
    }
}
