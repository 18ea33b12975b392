pub mod category;
pub mod news;

pub use category::Category;
pub use news::{Article, ArticleSource, NewsResponse};
