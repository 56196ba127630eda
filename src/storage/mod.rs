mod articles;
mod comments;
mod listing;
mod models;
mod postgres;
mod topics;
mod users;

pub use self::{
    articles::{ArticleFilter, ArticleStorage},
    comments::CommentStorage,
    listing::{ArticleSort, CommentSort, Listing, Order, SortColumn, UnknownColumn},
    models::{
        Article, ArticleSummary, Comment, NewArticle, NewComment, NewTopic, NewUser, Topic, User,
    },
    postgres::{DBPool, migrate, new_db_pool},
    topics::TopicStorage,
    users::UserStorage,
};
