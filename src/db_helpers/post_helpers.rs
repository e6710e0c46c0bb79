use sqlx::{Row, Sqlite, SqlitePool};

use crate::data_formats::CreatePostRequest;
use crate::errors::RequestError;
use crate::models::{FeedPost, MAX_POST_CONTENT_CHARS};

/// One query serves both the feed listing and single-post lookup: $1 is the
/// viewer (nullable), $2 a region filter (nullable), $3 a post id (nullable).
/// Newest first, post id as the tie-breaker.
const FEED_QUERY: &str = r#"
            SELECT posts.id                                       AS "id",
                   posts.author_id                                AS "author_id",
                   posts.content                                  AS "content",
                   posts.link_url                                 AS "link_url",
                   posts.image_url                                AS "image_url",
                   posts.region                                   AS "region",
                   posts.created_at                               AS "created_at",
                   profiles.name                                  AS "author_name",
                   profiles.avatar_url                            AS "author_avatar",
                   (SELECT Count(*)
                    FROM   post_likes
                    WHERE  post_likes.post_id = posts.id)         AS "likes_count",
                   (SELECT Count(*)
                    FROM   post_comments
                    WHERE  post_comments.post_id = posts.id)      AS "comments_count",
                   EXISTS (SELECT 1
                           FROM   post_likes
                           WHERE  post_likes.post_id = posts.id
                                  AND post_likes.user_id = $1)    AS "user_has_liked"
            FROM   posts
                   JOIN profiles
                     ON posts.author_id = profiles.id
            WHERE  ( $2 IS NULL
                      OR posts.region = $2
                      OR posts.region IS NULL )
                   AND ( $3 IS NULL
                          OR posts.id = $3 )
            ORDER  BY posts.created_at DESC, posts.id DESC
            LIMIT  $4 offset $5
     "#;

pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreatePostRequest {
        content,
        link_url,
        image_url,
    }: CreatePostRequest,
) -> Result<FeedPost, RequestError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(RequestError::RunTimeError("Post content must not be empty"));
    }
    if content.chars().count() > MAX_POST_CONTENT_CHARS {
        return Err(RequestError::RunTimeError("Post content is too long"));
    }

    let mut tx = pool.begin().await?;

    // The author's region is copied onto the row; later profile edits must
    // not reclassify posts that already exist.
    let author = sqlx::query("SELECT region FROM profiles WHERE id = $1")
        .bind(author_id)
        .fetch_optional(&mut tx)
        .await?;
    let region: Option<String> = match author {
        Some(row) => row.get("region"),
        None => return Err(RequestError::NotFound("Profile not found")),
    };

    let result = sqlx::query(
        r#"
        INSERT INTO posts (author_id, content, link_url, image_url, region)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(content)
    .bind(link_url)
    .bind(image_url)
    .bind(region)
    .fetch_one(&mut tx)
    .await?;
    let post_id: i64 = result.get("id");
    tx.commit().await?;

    let post = get_post_in_db(pool, post_id, Some(author_id)).await?;
    post.ok_or(RequestError::ServerError)
}

pub async fn get_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
    viewer: Option<i64>,
) -> Result<Option<FeedPost>, RequestError> {
    let result = sqlx::query_as::<Sqlite, FeedPost>(FEED_QUERY)
        .bind(viewer)
        .bind(Option::<String>::None)
        .bind(post_id)
        .bind(1_i64)
        .bind(0_i64)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn list_feed_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    region: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<Vec<FeedPost>, RequestError> {
    let result = sqlx::query_as::<Sqlite, FeedPost>(FEED_QUERY)
        .bind(viewer)
        .bind(region)
        .bind(Option::<i64>::None)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Atomic like toggle. The unique (post_id, user_id) key plus a conditional
/// insert/delete pair inside one transaction means each call strictly flips
/// the stored state, even under concurrent toggles from the same user.
/// Returns whether the post is liked after the call.
pub async fn toggle_like_in_db(
    pool: &SqlitePool,
    post_id: i64,
    user_id: i64,
) -> Result<bool, RequestError> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    if post.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO post_likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (post_id, user_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let liked = if inserted == 0 {
        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        true
    };
    tx.commit().await?;

    Ok(liked)
}
