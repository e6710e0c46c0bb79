use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::CreateNewsRequest;
use crate::errors::RequestError;
use crate::models::NewsItem;

const NEWS_COLUMNS: &str = "id, title, summary, source_url, published_at";

pub async fn list_news_in_db(pool: &SqlitePool) -> Result<Vec<NewsItem>, RequestError> {
    let query = format!(
        "SELECT {NEWS_COLUMNS} FROM news ORDER BY published_at DESC, id DESC"
    );
    let items = sqlx::query_as::<Sqlite, NewsItem>(&query)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn insert_news_in_db(
    pool: &SqlitePool,
    CreateNewsRequest {
        title,
        summary,
        source_url,
    }: CreateNewsRequest,
) -> Result<NewsItem, RequestError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RequestError::RunTimeError("Title must not be empty"));
    }
    let query = format!(
        "INSERT INTO news (title, summary, source_url) \
         VALUES ($1, $2, $3) \
         RETURNING {NEWS_COLUMNS}"
    );
    let item = sqlx::query_as::<Sqlite, NewsItem>(&query)
        .bind(title)
        .bind(summary)
        .bind(source_url)
        .fetch_one(pool)
        .await?;
    Ok(item)
}
