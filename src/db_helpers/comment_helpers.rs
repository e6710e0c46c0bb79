use sqlx::{Row, Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::{CommentWithAuthor, MAX_COMMENT_CHARS};

const COMMENT_COLUMNS: &str = r#"
            post_comments.id          AS "id",
            post_comments.post_id     AS "post_id",
            post_comments.author_id   AS "author_id",
            post_comments.body        AS "body",
            post_comments.created_at  AS "created_at",
            profiles.name             AS "author_name",
            profiles.avatar_url       AS "author_avatar"
     "#;

async fn check_post_exists(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    post_id: i64,
) -> Result<(), RequestError> {
    let post = sqlx::query("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(tx)
        .await?;
    match post {
        Some(_) => Ok(()),
        None => Err(RequestError::NotFound("Post not found")),
    }
}

/// Comments are append-only; there is no edit or delete path.
pub async fn add_comment_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    body: &str,
) -> Result<CommentWithAuthor, RequestError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(RequestError::RunTimeError("Comment must not be empty"));
    }
    if body.chars().count() > MAX_COMMENT_CHARS {
        return Err(RequestError::RunTimeError("Comment is too long"));
    }

    let mut tx = pool.begin().await?;
    check_post_exists(&mut tx, post_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO post_comments (post_id, author_id, body)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(body)
    .fetch_one(&mut tx)
    .await?;
    let comment_id: i64 = result.get("id");
    tx.commit().await?;

    let query = format!(
        "SELECT {COMMENT_COLUMNS} FROM post_comments \
         JOIN profiles ON post_comments.author_id = profiles.id \
         WHERE post_comments.id = $1"
    );
    let comment = sqlx::query_as::<Sqlite, CommentWithAuthor>(&query)
        .bind(comment_id)
        .fetch_one(pool)
        .await?;
    Ok(comment)
}

/// Oldest first, so a new comment always lists after every prior one.
pub async fn list_comments_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<CommentWithAuthor>, RequestError> {
    let mut tx = pool.begin().await?;
    check_post_exists(&mut tx, post_id).await?;

    let query = format!(
        "SELECT {COMMENT_COLUMNS} FROM post_comments \
         JOIN profiles ON post_comments.author_id = profiles.id \
         WHERE post_comments.post_id = $1 \
         ORDER BY post_comments.created_at ASC, post_comments.id ASC"
    );
    let comments = sqlx::query_as::<Sqlite, CommentWithAuthor>(&query)
        .bind(post_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comments)
}
