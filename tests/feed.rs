use cabhub::data_formats::{CreatePostRequest, UpdateProfileRequest};
use cabhub::db_helpers::{
    add_comment_in_db, create_post_in_db, get_post_in_db, list_comments_in_db, list_feed_in_db,
    toggle_like_in_db, update_profile_in_db,
};
use cabhub::errors::RequestError;
use cabhub::models::Profile;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

async fn seed_driver(pool: &SqlitePool, email: &str, name: &str, region: &str) -> Profile {
    cabhub::db_helpers::insert_profile(pool, email, "not-a-real-hash", name, region)
        .await
        .expect("failed to insert profile")
}

fn post_request(content: &str) -> CreatePostRequest {
    CreatePostRequest {
        content: content.to_string(),
        link_url: None,
        image_url: None,
    }
}

#[tokio::test]
async fn over_length_post_is_rejected_and_nothing_is_inserted() {
    let pool = test_pool().await;
    let driver = seed_driver(&pool, "a@example.com", "Asha", "London").await;

    let result = create_post_in_db(&pool, driver.id, post_request(&"x".repeat(1001))).await;
    assert!(matches!(result, Err(RequestError::RunTimeError(_))));

    let result = create_post_in_db(&pool, driver.id, post_request("   ")).await;
    assert!(matches!(result, Err(RequestError::RunTimeError(_))));

    let feed = list_feed_in_db(&pool, None, None, 20, 0).await.unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn post_content_at_the_bound_is_accepted() {
    let pool = test_pool().await;
    let driver = seed_driver(&pool, "a@example.com", "Asha", "London").await;

    let post = create_post_in_db(&pool, driver.id, post_request(&"x".repeat(1000)))
        .await
        .unwrap();
    assert_eq!(post.content.chars().count(), 1000);
}

#[tokio::test]
async fn post_region_is_a_snapshot_of_the_author_region() {
    let pool = test_pool().await;
    let driver = seed_driver(&pool, "a@example.com", "Asha", "London").await;

    let post = create_post_in_db(&pool, driver.id, post_request("Rank at the station is open again"))
        .await
        .unwrap();
    assert_eq!(post.region.as_deref(), Some("London"));

    update_profile_in_db(
        &pool,
        driver.id,
        UpdateProfileRequest {
            region: Some("Wales".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // The stored post keeps the region it was created under.
    let post = get_post_in_db(&pool, post.id, None).await.unwrap().unwrap();
    assert_eq!(post.region.as_deref(), Some("London"));
}

#[tokio::test]
async fn like_toggle_strictly_alternates() {
    let pool = test_pool().await;
    let author = seed_driver(&pool, "a@example.com", "Asha", "London").await;
    let liker = seed_driver(&pool, "b@example.com", "Bryn", "Wales").await;
    let post = create_post_in_db(&pool, author.id, post_request("Airport queue moves fast today"))
        .await
        .unwrap();

    for round in 0..3 {
        let liked = toggle_like_in_db(&pool, post.id, liker.id).await.unwrap();
        assert_eq!(liked, round % 2 == 0);
        let seen = get_post_in_db(&pool, post.id, Some(liker.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seen.user_has_liked, liked);
        assert_eq!(seen.likes_count, if liked { 1 } else { 0 });
    }
}

#[tokio::test]
async fn toggling_a_like_on_a_missing_post_is_not_found() {
    let pool = test_pool().await;
    let driver = seed_driver(&pool, "a@example.com", "Asha", "London").await;

    let result = toggle_like_in_db(&pool, 999, driver.id).await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn regional_feed_matches_stored_region_or_none() {
    let pool = test_pool().await;
    let asha = seed_driver(&pool, "a@example.com", "Asha", "London").await;
    let bryn = seed_driver(&pool, "b@example.com", "Bryn", "Wales").await;

    let london_post = create_post_in_db(&pool, asha.id, post_request("London knowledge test tips"))
        .await
        .unwrap();
    let wales_post = create_post_in_db(&pool, bryn.id, post_request("Cardiff rank changes"))
        .await
        .unwrap();
    let legacy_post = create_post_in_db(&pool, asha.id, post_request("Old post from before regions"))
        .await
        .unwrap();
    sqlx::query("UPDATE posts SET region = NULL WHERE id = $1")
        .bind(legacy_post.id)
        .execute(&pool)
        .await
        .unwrap();

    let all = list_feed_in_db(&pool, None, None, 20, 0).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|post| post.id).collect();
    // Newest first.
    assert_eq!(ids, vec![legacy_post.id, wales_post.id, london_post.id]);

    let london = list_feed_in_db(&pool, Some(asha.id), Some("London"), 20, 0)
        .await
        .unwrap();
    let ids: Vec<i64> = london.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![legacy_post.id, london_post.id]);
}

#[tokio::test]
async fn comments_are_validated_and_listed_oldest_first() {
    let pool = test_pool().await;
    let author = seed_driver(&pool, "a@example.com", "Asha", "London").await;
    let post = create_post_in_db(&pool, author.id, post_request("MOT centre recommendations?"))
        .await
        .unwrap();

    let result = add_comment_in_db(&pool, author.id, post.id, "   ").await;
    assert!(matches!(result, Err(RequestError::RunTimeError(_))));

    let result = add_comment_in_db(&pool, author.id, post.id, &"y".repeat(501)).await;
    assert!(matches!(result, Err(RequestError::RunTimeError(_))));

    let result = add_comment_in_db(&pool, author.id, 999, "hello").await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));

    let first = add_comment_in_db(&pool, author.id, post.id, "Garage on Mill Road")
        .await
        .unwrap();
    let second = add_comment_in_db(&pool, author.id, post.id, "Avoid the one by the docks")
        .await
        .unwrap();

    let comments = list_comments_in_db(&pool, post.id).await.unwrap();
    let ids: Vec<i64> = comments.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let seen = get_post_in_db(&pool, post.id, None).await.unwrap().unwrap();
    assert_eq!(seen.comments_count, 2);
}

// The walkthrough from the product notes: Asha (London) posts, Bryn (Wales)
// likes, unlikes, then comments.
#[tokio::test]
async fn like_unlike_comment_walkthrough() {
    let pool = test_pool().await;
    let asha = seed_driver(&pool, "a@example.com", "Asha", "London").await;
    let bryn = seed_driver(&pool, "b@example.com", "Bryn", "Wales").await;

    let post = create_post_in_db(&pool, asha.id, post_request("Carry a spare charging cable"))
        .await
        .unwrap();

    assert!(toggle_like_in_db(&pool, post.id, bryn.id).await.unwrap());
    let seen = get_post_in_db(&pool, post.id, Some(bryn.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen.likes_count, 1);

    assert!(!toggle_like_in_db(&pool, post.id, bryn.id).await.unwrap());
    add_comment_in_db(&pool, bryn.id, post.id, "Good tip").await.unwrap();

    let feed = list_feed_in_db(&pool, Some(asha.id), None, 20, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    let seen = &feed[0];
    assert_eq!(seen.likes_count, 0);
    assert_eq!(seen.comments_count, 1);
    assert!(!seen.user_has_liked);
    assert_eq!(seen.author_name, "Asha");
}
