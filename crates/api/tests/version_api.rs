//! HTTP-level integration tests for the blog version endpoints.
//!
//! Blogs and their initial versions are created through the repository and
//! engine layers so the tests stay focused on HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_config, delete_auth, get, get_auth,
    post_empty_auth, post_json_auth, test_config, token_for,
};
use folio_core::versioning::RetentionPolicy;
use folio_db::models::blog::{CreateBlog, UpdateBlog};
use folio_db::models::tag::CreateTag;
use folio_db::repositories::{BlogRepo, TagRepo};
use folio_db::versioning::{SnapshotCapture, VersionReader};
use serde_json::json;
use sqlx::PgPool;

const AUTHOR: i64 = 501;
const STRANGER: i64 = 502;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a blog with one tag and capture its initial version.
async fn setup_blog(pool: &PgPool, slug: &str) -> (i64, i64) {
    let tag = TagRepo::create(
        pool,
        &CreateTag {
            name: format!("Tag {slug}"),
            slug: format!("tag-{slug}"),
        },
    )
    .await
    .unwrap();
    let blog = BlogRepo::create(
        pool,
        AUTHOR,
        &CreateBlog {
            title: "Initial".to_string(),
            slug: slug.to_string(),
            excerpt: None,
            content: "First draft".to_string(),
            thumbnail: None,
            status: None,
            visibility: None,
            category_id: None,
            tag_ids: vec![tag.id],
        },
    )
    .await
    .unwrap();
    SnapshotCapture::capture(pool, blog.id, AUTHOR, None, &RetentionPolicy::default())
        .await
        .unwrap();
    (blog.id, tag.id)
}

async fn edit_and_capture(pool: &PgPool, blog_id: i64, title: &str) {
    BlogRepo::update(
        pool,
        blog_id,
        &UpdateBlog {
            title: Some(title.to_string()),
            tag_ids: Some(vec![]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    SnapshotCapture::capture(pool, blog_id, AUTHOR, None, &RetentionPolicy::default())
        .await
        .unwrap();
}

fn versions_uri(blog_id: i64) -> String {
    format!("/api/v1/blogs/{blog_id}/versions")
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_versions_newest_first_with_page_info(pool: PgPool) {
    let (blog_id, tag_id) = setup_blog(&pool, "list").await;
    edit_and_capture(&pool, blog_id, "Second").await;

    let app = build_test_app(pool);
    let response = get_auth(app, &versions_uri(blog_id), &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["version_number"], 2);
    assert_eq!(items[0]["title"], "Second");
    assert_eq!(items[0]["tag_ids"], json!([]));
    assert_eq!(items[1]["version_number"], 1);
    assert_eq!(items[1]["tag_ids"], json!([tag_id]));
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["page_size"], 20);
    assert_eq!(json["data"]["total_pages"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_versions_clamps_page_size(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "clamp").await;
    edit_and_capture(&pool, blog_id, "Second").await;

    let app = build_test_app(pool);
    let uri = format!("{}?page=0&page_size=1000", versions_uri(blog_id));
    let json = body_json(get_auth(app, &uri, &token_for(AUTHOR)).await).await;

    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["page_size"], 100);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_versions_requires_token(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "anon").await;

    let app = build_test_app(pool);
    let response = get(app, &versions_uri(blog_id)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_versions_of_someone_elses_blog_is_forbidden(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "foreign").await;

    let app = build_test_app(pool);
    let response = get_auth(app, &versions_uri(blog_id), &token_for(STRANGER)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_versions_of_missing_blog_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(app, &versions_uri(999_999), &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Checkpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkpoint_returns_201_with_summary(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "checkpoint").await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        &versions_uri(blog_id),
        json!({ "change_summary": "before rewrite" }),
        &token_for(AUTHOR),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["version_number"], 2);
    assert_eq!(json["data"]["change_summary"], "before rewrite");
    assert_eq!(json["data"]["editor_id"], AUTHOR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkpoint_without_body_uses_default_summary(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "nobody").await;

    let app = build_test_app(pool);
    let response = post_empty_auth(app, &versions_uri(blog_id), &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["change_summary"], "Manual checkpoint");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkpoint_rejects_overlong_summary(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "long").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &versions_uri(blog_id),
        json!({ "change_summary": "x".repeat(501) }),
        &token_for(AUTHOR),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    assert_eq!(VersionReader::count(&pool, blog_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkpoint_prunes_with_configured_policy(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "policy").await;

    let mut config = test_config();
    config.versioning = RetentionPolicy::new(2, 3).unwrap();
    let token = token_for(AUTHOR);

    for _ in 0..3 {
        let app = build_test_app_with_config(pool.clone(), config.clone());
        let response = post_empty_auth(app, &versions_uri(blog_id), &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page = VersionReader::list(&pool, blog_id, 1, 20).await.unwrap();
    let numbers: Vec<i32> = page.items.iter().map(|i| i.version.version_number).collect();
    assert_eq!(numbers, vec![4, 3]);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_version_includes_tag_snapshot(pool: PgPool) {
    let (blog_id, tag_id) = setup_blog(&pool, "detail").await;
    let v1 = VersionReader::get_by_number(&pool, blog_id, 1).await.unwrap();

    let app = build_test_app(pool);
    let uri = format!("{}/{}", versions_uri(blog_id), v1.id);
    let response = get_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], v1.id);
    assert_eq!(json["data"]["title"], "Initial");
    assert_eq!(json["data"]["tags"][0]["id"], tag_id);
    assert_eq!(json["data"]["tags"][0]["slug"], "tag-detail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_version_returns_404(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "missing").await;

    let app = build_test_app(pool);
    let uri = format!("{}/{}", versions_uri(blog_id), 999_999);
    let response = get_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_version_of_other_blog_returns_400(pool: PgPool) {
    let (blog_a, _) = setup_blog(&pool, "blog-a").await;
    let (blog_b, _) = setup_blog(&pool, "blog-b").await;
    let b_v1 = VersionReader::get_by_number(&pool, blog_b, 1).await.unwrap();

    let app = build_test_app(pool);
    let uri = format!("{}/{}", versions_uri(blog_a), b_v1.id);
    let response = get_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VERSION_MISMATCH");
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_returns_restored_blog_and_appends_version(pool: PgPool) {
    let (blog_id, tag_id) = setup_blog(&pool, "restore").await;
    edit_and_capture(&pool, blog_id, "Rewritten").await;
    let v1 = VersionReader::get_by_number(&pool, blog_id, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}/restore", versions_uri(blog_id), v1.id);
    let response = post_empty_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], blog_id);
    assert_eq!(json["data"]["title"], "Initial");
    assert_eq!(json["data"]["tag_ids"], json!([tag_id]));

    let latest = VersionReader::latest(&pool, blog_id).await.unwrap().unwrap();
    assert_eq!(latest.version_number, 3);
    assert_eq!(latest.change_summary.as_deref(), Some("Restored to version 1"));
    assert_eq!(VersionReader::count(&pool, blog_id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_by_non_author_is_forbidden(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "restore-forbidden").await;
    let v1 = VersionReader::get_by_number(&pool, blog_id, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}/restore", versions_uri(blog_id), v1.id);
    let response = post_empty_auth(app, &uri, &token_for(STRANGER)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(VersionReader::count(&pool, blog_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_cross_blog_version_returns_400(pool: PgPool) {
    let (blog_a, _) = setup_blog(&pool, "cross-a").await;
    let (blog_b, _) = setup_blog(&pool, "cross-b").await;
    let b_v1 = VersionReader::get_by_number(&pool, blog_b, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}/restore", versions_uri(blog_a), b_v1.id);
    let response = post_empty_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VERSION_MISMATCH");

    assert_eq!(VersionReader::count(&pool, blog_a).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_version_returns_204(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "delete").await;
    edit_and_capture(&pool, blog_id, "Second").await;
    let v1 = VersionReader::get_by_number(&pool, blog_id, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}", versions_uri(blog_id), v1.id);
    let response = delete_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining = VersionReader::list(&pool, blog_id, 1, 20).await.unwrap();
    assert_eq!(remaining.items.len(), 1);
    assert_eq!(remaining.items[0].version.version_number, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_version_by_non_author_is_forbidden(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "delete-forbidden").await;
    let v1 = VersionReader::get_by_number(&pool, blog_id, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}", versions_uri(blog_id), v1.id);
    let response = delete_auth(app, &uri, &token_for(STRANGER)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(VersionReader::count(&pool, blog_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_version_through_other_blog_returns_400(pool: PgPool) {
    let (blog_a, _) = setup_blog(&pool, "del-a").await;
    let (blog_b, _) = setup_blog(&pool, "del-b").await;
    let b_v1 = VersionReader::get_by_number(&pool, blog_b, 1).await.unwrap();

    let app = build_test_app(pool.clone());
    let uri = format!("{}/{}", versions_uri(blog_a), b_v1.id);
    let response = delete_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(VersionReader::count(&pool, blog_b).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_version_returns_404(pool: PgPool) {
    let (blog_id, _) = setup_blog(&pool, "delete-missing").await;

    let app = build_test_app(pool);
    let uri = format!("{}/{}", versions_uri(blog_id), 999_999);
    let response = delete_auth(app, &uri, &token_for(AUTHOR)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
