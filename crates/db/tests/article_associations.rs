//! Integration tests for article category/tag association management.
//!
//! - Create inserts one join row per requested id
//! - Update replaces the whole set (no stale rows, no duplicates)
//! - Named tags are created on demand inside the article transaction
//! - Delete removes join rows together with the article
//! - Failed writes roll back the article row

use sqlx::PgPool;
use matuto_db::models::article::{CreateArticle, UpdateArticle};
use matuto_db::models::category::CreateCategory;
use matuto_db::models::tag::CreateTag;
use matuto_db::repositories::{ArticleRepo, CategoryRepo, TagRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_article(title: &str) -> CreateArticle {
    CreateArticle {
        title: title.to_string(),
        content: format!("Body of {title}"),
        ..Default::default()
    }
}

async fn category(pool: &PgPool, name: &str) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn tag(pool: &PgPool, name: &str) -> i64 {
    TagRepo::create(
        pool,
        &CreateTag {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn join_rows(pool: &PgPool, article_id: i64) -> (Vec<i64>, Vec<i64>) {
    let categories = ArticleRepo::category_ids(pool, article_id).await.unwrap();
    let tags = ArticleRepo::tag_ids(pool, article_id).await.unwrap();
    (categories, tags)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_inserts_join_rows(pool: PgPool) {
    let c1 = category(&pool, "Rust").await;
    let c2 = category(&pool, "Databases").await;
    let t1 = tag(&pool, "async").await;

    let detail = ArticleRepo::create(
        &pool,
        &CreateArticle {
            category_ids: vec![c2, c1, c1],
            tag_ids: vec![t1],
            ..new_article("Hello")
        },
        None,
    )
    .await
    .unwrap();

    let mut expected = vec![c1, c2];
    expected.sort_unstable();
    assert_eq!(detail.category_ids, expected);
    assert_eq!(detail.tag_ids, vec![t1]);
    assert_eq!(join_rows(&pool, detail.article.id).await, (expected, vec![t1]));
    assert_eq!(detail.article.content_model, "markdown");
    assert_eq!(detail.article.article_type, "article");
    assert!(detail.article.is_comment);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_whole_set(pool: PgPool) {
    let c1 = category(&pool, "One").await;
    let c2 = category(&pool, "Two").await;
    let c3 = category(&pool, "Three").await;
    let t1 = tag(&pool, "a").await;
    let t2 = tag(&pool, "b").await;

    let created = ArticleRepo::create(
        &pool,
        &CreateArticle {
            category_ids: vec![c1, c2],
            tag_ids: vec![t1],
            ..new_article("Replace me")
        },
        None,
    )
    .await
    .unwrap();
    let id = created.article.id;

    let updated = ArticleRepo::update(
        &pool,
        id,
        &UpdateArticle {
            category_ids: vec![c3, c3],
            tag_ids: vec![t2, t1],
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let mut tags = vec![t1, t2];
    tags.sort_unstable();
    assert_eq!(updated.category_ids, vec![c3]);
    assert_eq!(join_rows(&pool, id).await, (vec![c3], tags));
    assert_eq!(updated.article.title, "Replace me");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_empty_sets_clears_associations(pool: PgPool) {
    let c1 = category(&pool, "Solo").await;
    let t1 = tag(&pool, "solo").await;
    let created = ArticleRepo::create(
        &pool,
        &CreateArticle {
            category_ids: vec![c1],
            tag_ids: vec![t1],
            ..new_article("Clear me")
        },
        None,
    )
    .await
    .unwrap();

    ArticleRepo::update(&pool, created.article.id, &UpdateArticle::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(join_rows(&pool, created.article.id).await, (vec![], vec![]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_named_tags_are_created_once(pool: PgPool) {
    let existing = tag(&pool, "rust").await;

    let detail = ArticleRepo::create(
        &pool,
        &CreateArticle {
            add_tags: vec!["rust".into(), "新标签".into(), "  ".into()],
            ..new_article("Tagged")
        },
        None,
    )
    .await
    .unwrap();

    assert_eq!(detail.tag_ids.len(), 2);
    assert!(detail.tag_ids.contains(&existing));

    let created: (String, String) =
        sqlx::query_as("SELECT name, slug FROM tags WHERE id <> $1")
            .bind(existing)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(created, ("新标签".to_string(), "xbq".to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_unknown_article_returns_none(pool: PgPool) {
    let result = ArticleRepo::update(&pool, 9_999, &UpdateArticle::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_join_insert_rolls_back_article(pool: PgPool) {
    // Category 4242 does not exist, so the join insert violates its FK.
    let result = ArticleRepo::create(
        &pool,
        &CreateArticle {
            category_ids: vec![4242],
            ..new_article("Doomed")
        },
        None,
    )
    .await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_join_rows(pool: PgPool) {
    let c1 = category(&pool, "Gone").await;
    let t1 = tag(&pool, "gone").await;
    let created = ArticleRepo::create(
        &pool,
        &CreateArticle {
            category_ids: vec![c1],
            tag_ids: vec![t1],
            ..new_article("Delete me")
        },
        None,
    )
    .await
    .unwrap();

    assert!(ArticleRepo::delete(&pool, created.article.id).await.unwrap());
    assert!(!ArticleRepo::delete(&pool, created.article.id).await.unwrap());

    let rows: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM article_categories) + (SELECT COUNT(*) FROM article_tags)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 0);

    // The category and tag are free again.
    assert_eq!(CategoryRepo::article_count(&pool, c1).await.unwrap(), 0);
    assert_eq!(TagRepo::article_count(&pool, t1).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_at_is_set_on_first_publish_only(pool: PgPool) {
    let draft = ArticleRepo::create(&pool, &new_article("Draft"), None)
        .await
        .unwrap();
    assert!(draft.article.published_at.is_none());

    let published = ArticleRepo::update(
        &pool,
        draft.article.id,
        &UpdateArticle {
            status: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    let first = published.article.published_at.expect("stamped on publish");

    let unpublished = ArticleRepo::update(
        &pool,
        draft.article.id,
        &UpdateArticle {
            status: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(unpublished.article.published_at, Some(first));
}
