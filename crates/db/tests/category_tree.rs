//! Integration tests for category parents, delete guards, and listing.

use assert_matches::assert_matches;
use matuto_core::category::{delete_blocker, validate_parent};
use matuto_core::error::CoreError;
use matuto_core::pagination::PageRequest;
use matuto_db::models::article::CreateArticle;
use matuto_db::models::category::{CategoryQuery, CreateCategory, UpdateCategory};
use matuto_db::repositories::{ArticleRepo, CategoryRepo, CategoryUpdateError};
use sqlx::PgPool;

fn new_category(name: &str, parent_id: Option<i64>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        parent_id,
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_parent_creates_root(pool: PgPool) {
    let root = CategoryRepo::create(&pool, &new_category("Root", Some(-1)))
        .await
        .unwrap();
    assert_eq!(root.parent_id, None);
    assert_eq!(root.status, 0);

    let child = CategoryRepo::create(&pool, &new_category("Child", Some(root.id)))
        .await
        .unwrap();
    assert_eq!(child.parent_id, Some(root.id));

    let moved = CategoryRepo::update(
        &pool,
        child.id,
        &UpdateCategory {
            parent_id: Some(-1),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.parent_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_without_parent_keeps_parent(pool: PgPool) {
    let root = CategoryRepo::create(&pool, &new_category("Root", None)).await.unwrap();
    let child = CategoryRepo::create(&pool, &new_category("Child", Some(root.id)))
        .await
        .unwrap();

    let renamed = CategoryRepo::update(
        &pool,
        child.id,
        &UpdateCategory {
            name: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.parent_id, Some(root.id));
    assert_eq!(renamed.name, "Renamed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_descendant_parent_is_detected(pool: PgPool) {
    let a = CategoryRepo::create(&pool, &new_category("A", None)).await.unwrap();
    let b = CategoryRepo::create(&pool, &new_category("B", Some(a.id))).await.unwrap();
    let c = CategoryRepo::create(&pool, &new_category("C", Some(b.id))).await.unwrap();

    let tree = CategoryRepo::adjacency(&pool).await.unwrap();
    assert!(validate_parent(Some(a.id), Some(c.id), &tree).is_err());
    assert!(validate_parent(Some(a.id), Some(a.id), &tree).is_err());
    assert!(validate_parent(Some(c.id), Some(a.id), &tree).is_ok());
}

fn move_under(parent_id: i64) -> UpdateCategory {
    UpdateCategory {
        parent_id: Some(parent_id),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rejects_cycle(pool: PgPool) {
    let a = CategoryRepo::create(&pool, &new_category("A", None)).await.unwrap();
    let b = CategoryRepo::create(&pool, &new_category("B", Some(a.id))).await.unwrap();

    let result = CategoryRepo::update(&pool, a.id, &move_under(b.id)).await;
    assert_matches!(
        result,
        Err(CategoryUpdateError::InvalidParent(CoreError::Validation(_)))
    );

    let a = CategoryRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(a.parent_id, None, "rejected move leaves the row untouched");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_swaps_cannot_form_cycle(pool: PgPool) {
    let a = CategoryRepo::create(&pool, &new_category("A", None)).await.unwrap();
    let b = CategoryRepo::create(&pool, &new_category("B", None)).await.unwrap();

    let move_a = move_under(b.id);
    let move_b = move_under(a.id);
    let (first, second) = tokio::join!(
        CategoryRepo::update(&pool, a.id, &move_a),
        CategoryRepo::update(&pool, b.id, &move_b),
    );
    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one of two opposing moves may win"
    );

    let tree = CategoryRepo::adjacency(&pool).await.unwrap();
    assert!(tree.children_of(a.id).is_empty() || tree.children_of(b.id).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_guards(pool: PgPool) {
    let parent = CategoryRepo::create(&pool, &new_category("Parent", None)).await.unwrap();
    let child = CategoryRepo::create(&pool, &new_category("Child", Some(parent.id)))
        .await
        .unwrap();

    // Parent has a child.
    let children = CategoryRepo::child_count(&pool, parent.id).await.unwrap();
    let articles = CategoryRepo::article_count(&pool, parent.id).await.unwrap();
    assert!(delete_blocker(children, articles).is_some());

    // Child is used by an article.
    let article = ArticleRepo::create(
        &pool,
        &CreateArticle {
            title: "Filed".to_string(),
            content: "body".to_string(),
            category_ids: vec![child.id],
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    let children = CategoryRepo::child_count(&pool, child.id).await.unwrap();
    let articles = CategoryRepo::article_count(&pool, child.id).await.unwrap();
    assert_eq!((children, articles), (0, 1));
    assert!(delete_blocker(children, articles).is_some());

    // Once the article is gone both can be deleted, leaf first.
    ArticleRepo::delete(&pool, article.article.id).await.unwrap();
    assert!(delete_blocker(
        CategoryRepo::child_count(&pool, child.id).await.unwrap(),
        CategoryRepo::article_count(&pool, child.id).await.unwrap(),
    )
    .is_none());
    assert!(CategoryRepo::delete(&pool, child.id).await.unwrap());
    assert!(CategoryRepo::delete(&pool, parent.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_name_and_status(pool: PgPool) {
    CategoryRepo::create(&pool, &new_category("Rust Lang", None)).await.unwrap();
    CategoryRepo::create(&pool, &new_category("Go Lang", None)).await.unwrap();
    CategoryRepo::create(
        &pool,
        &CreateCategory {
            status: Some(1),
            ..new_category("Rusty Hidden", None)
        },
    )
    .await
    .unwrap();

    let pagination = PageRequest::default().validate().unwrap();
    let rust = CategoryRepo::list_page(
        &pool,
        &CategoryQuery {
            name: Some("rust".to_string()),
            ..Default::default()
        },
        pagination,
    )
    .await
    .unwrap();
    assert_eq!(rust.total, 2);

    let active_rust = CategoryRepo::list_page(
        &pool,
        &CategoryQuery {
            name: Some("rust".to_string()),
            status: Some(0),
            ..Default::default()
        },
        pagination,
    )
    .await
    .unwrap();
    assert_eq!(active_rust.total, 1);
    assert_eq!(active_rust.items[0].name, "Rust Lang");

    let active = CategoryRepo::list_all(&pool, true).await.unwrap();
    assert_eq!(active.len(), 2);
}
