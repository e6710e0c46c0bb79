mod assistant;
mod authentication;
pub mod data_formats;
pub mod db_helpers;
pub mod errors;
mod handlers;
pub mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
use tracing::info;

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    let db = init_db().await?;
    // One pool and one outbound client for the whole process, shared by
    // reference through extensions.
    let client = reqwest::Client::new();
    let app = app.layer(Extension(Arc::new(db))).layer(Extension(client));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db() -> Result<SqlitePool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
        info!("creating database {db_url}");
        Sqlite::create_database(&db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(&db_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/users", post(register_user))
        .route("/users/login", post(login_user))
        .route("/user", get(get_current_user).put(update_profile))
        .route("/profiles/:id", get(get_profile))
        .route("/posts", get(list_feed).post(create_post))
        .route("/posts/:id/like", post(toggle_like))
        .route("/posts/:id/comments", get(list_comments).post(add_comment))
        .route("/blog", get(list_blog_posts).post(create_blog_post))
        .route(
            "/blog/:slug",
            get(get_blog_post)
                .put(update_blog_post)
                .delete(delete_blog_post),
        )
        .route("/news", get(list_news).post(create_news))
        .route("/marketplace", get(list_companies).post(create_company))
        .route("/feedback", get(list_feedback).post(submit_feedback))
        .route("/assistant/chat", post(chat_with_assistant))
        .fallback(not_found)
}

/// Lowercases a title and collapses anything that is not ascii alphanumeric
/// into single dashes. Blog slugs must stay URL-safe.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for character in title.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(character.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;
    use crate::models::Region;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Keeping your badge  visible"), "keeping-your-badge-visible");
        assert_eq!(slugify("  VAT & the self-employed driver! "), "vat-the-self-employed-driver");
        assert_eq!(slugify("2024 licensing changes"), "2024-licensing-changes");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café owners' guide"), "caf-owners-guide");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn region_parse_is_case_insensitive() {
        assert_eq!(Region::parse("london"), Some(Region::London));
        assert_eq!(Region::parse(" Wales "), Some(Region::Wales));
        assert_eq!(Region::parse("northern ireland"), Some(Region::NorthernIreland));
        assert_eq!(Region::parse("Narnia"), None);
    }

    #[test]
    fn region_round_trips_through_canonical_name() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
    }
}
