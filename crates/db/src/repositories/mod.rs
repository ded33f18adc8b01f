//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod attach_repo;
pub mod category_repo;
pub mod comment_repo;
pub mod tag_repo;
pub mod user_repo;

pub use article_repo::ArticleRepo;
pub use attach_repo::AttachRepo;
pub use category_repo::{CategoryRepo, CategoryUpdateError};
pub use comment_repo::CommentRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
