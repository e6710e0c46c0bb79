use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{CreateBlogPostRequest, UpdateBlogPostRequest};
use crate::errors::RequestError;
use crate::models::BlogPost;
use crate::slugify;

use super::UpdateBuilder;

const BLOG_COLUMNS: &str =
    "id, slug, title, excerpt, body, image_url, published, author_id, created_at, updated_at";

pub async fn create_blog_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreateBlogPostRequest {
        title,
        excerpt,
        body,
        image_url,
        published,
    }: CreateBlogPostRequest,
) -> Result<BlogPost, RequestError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RequestError::RunTimeError("Title must not be empty"));
    }
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(RequestError::RunTimeError(
            "Title must contain letters or digits",
        ));
    }

    let query = format!(
        "INSERT INTO blog_posts (slug, title, excerpt, body, image_url, published, author_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {BLOG_COLUMNS}"
    );
    let post = sqlx::query_as::<Sqlite, BlogPost>(&query)
        .bind(&slug)
        .bind(title)
        .bind(excerpt)
        .bind(body)
        .bind(image_url)
        .bind(published)
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(post)
}

pub async fn get_blog_post_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<BlogPost>, RequestError> {
    let query = format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE slug = $1");
    let post = sqlx::query_as::<Sqlite, BlogPost>(&query)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(post)
}

/// Drafts only surface when `include_drafts` is set (admin listings).
pub async fn list_blog_posts_in_db(
    pool: &SqlitePool,
    include_drafts: bool,
) -> Result<Vec<BlogPost>, RequestError> {
    let query = format!(
        "SELECT {BLOG_COLUMNS} FROM blog_posts \
         WHERE published = 1 OR $1 \
         ORDER BY created_at DESC, id DESC"
    );
    let posts = sqlx::query_as::<Sqlite, BlogPost>(&query)
        .bind(include_drafts)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

pub async fn update_blog_post_in_db(
    pool: &SqlitePool,
    slug: &str,
    UpdateBlogPostRequest {
        title,
        excerpt,
        body,
        image_url,
        published,
    }: UpdateBlogPostRequest,
) -> Result<BlogPost, RequestError> {
    // A title change re-derives the slug; the unique index keeps collisions
    // out and the handler reports them as validation errors.
    let new_slug = title.as_deref().map(slugify);
    let builder = UpdateBuilder::new()
        .set("title", title)
        .set("slug", new_slug.clone())
        .set("excerpt", excerpt)
        .set("body", body)
        .set("image_url", image_url)
        .set(
            "published",
            published.map(|flag| i64::from(flag).to_string()),
        )
        .touch("updated_at = CURRENT_TIMESTAMP");

    let (query, params) = builder.build("blog_posts", "slug = ?");
    let mut query = sqlx::query(&query);
    for param in params {
        query = query.bind(param);
    }
    let result = query.bind(slug).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Blog post not found"));
    }

    let slug = new_slug.unwrap_or_else(|| slug.to_owned());
    match get_blog_post_by_slug_in_db(pool, &slug).await? {
        Some(post) => Ok(post),
        None => Err(RequestError::ServerError),
    }
}

pub async fn delete_blog_post_in_db(pool: &SqlitePool, slug: &str) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Blog post not found"));
    }
    Ok(())
}
