use std::time::Duration;

use axum::{http::StatusCode, Json, Router};
use cabhub::{get_random_free_port, make_router, run_app};
use serde_json::{json, Value};

async fn wait_until_alive(client: &reqwest::Client, base: &str) {
    for _ in 0..50 {
        if client
            .get(format!("{base}/check_health"))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not come up");
}

async fn register(client: &reqwest::Client, base: &str, email: &str, name: &str, region: &str) -> String {
    let response = client
        .post(format!("{base}/users"))
        .json(&json!({
            "email": email,
            "password": "a-long-enough-password",
            "name": name,
            "region": region,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    body["user"]["token"].as_str().unwrap().to_string()
}

/// Drives the whole router over HTTP: registration, the feed walkthrough,
/// and the assistant relay against a stub completion endpoint.
#[tokio::test]
async fn full_stack_walkthrough() {
    let db_path = std::env::temp_dir().join(format!("cabhub-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&db_path);
    std::env::set_var("DATABASE_URL", format!("sqlite:{}", db_path.display()));
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    std::env::remove_var("OPENAI_API_KEY");

    let (_, addr) = get_random_free_port();
    tokio::spawn(run_app(make_router(), addr));
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");
    wait_until_alive(&client, &base).await;

    // Region names are validated at registration.
    let response = client
        .post(format!("{base}/users"))
        .json(&json!({
            "email": "x@example.com",
            "password": "pw",
            "name": "X",
            "region": "Atlantis",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let token_a = register(&client, &base, "asha@example.com", "Asha", "London").await;
    let token_b = register(&client, &base, "bryn@example.com", "Bryn", "Wales").await;

    // Posting needs a token.
    let response = client
        .post(format!("{base}/posts"))
        .json(&json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Over-bound content is rejected.
    let response = client
        .post(format!("{base}/posts"))
        .bearer_auth(&token_a)
        .json(&json!({ "content": "x".repeat(1001) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Asha posts; the row carries her region.
    let response = client
        .post(format!("{base}/posts"))
        .bearer_auth(&token_a)
        .json(&json!({ "content": "Carry a spare charging cable" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let post_id = body["post"]["id"].as_i64().unwrap();
    assert_eq!(body["post"]["region"], "London");

    // Bryn likes, unlikes, then comments.
    let body: Value = client
        .post(format!("{base}/posts/{post_id}/like"))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["post"]["likesCount"], 1);
    assert_eq!(body["post"]["userHasLiked"], true);

    let body: Value = client
        .post(format!("{base}/posts/{post_id}/like"))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["post"]["likesCount"], 0);
    assert_eq!(body["post"]["userHasLiked"], false);

    let response = client
        .post(format!("{base}/posts/{post_id}/comments"))
        .bearer_auth(&token_b)
        .json(&json!({ "body": "Good tip" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Asha's all-scope feed reflects the walkthrough.
    let body: Value = client
        .get(format!("{base}/posts"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["postsCount"], 1);
    let post = &body["posts"][0];
    assert_eq!(post["commentsCount"], 1);
    assert_eq!(post["likesCount"], 0);
    assert_eq!(post["userHasLiked"], false);
    assert_eq!(post["author"]["name"], "Asha");

    // Regional scope: the London post is in Asha's feed, not Bryn's.
    let body: Value = client
        .get(format!("{base}/posts?scope=mine"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["postsCount"], 1);

    let body: Value = client
        .get(format!("{base}/posts?scope=mine"))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["postsCount"], 0);

    let response = client
        .get(format!("{base}/posts?scope=mine"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin surface is closed to ordinary drivers.
    let response = client
        .post(format!("{base}/blog"))
        .bearer_auth(&token_a)
        .json(&json!({
            "title": "Winter driving",
            "excerpt": "Stay safe",
            "body": "Check your tyres",
            "published": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Assistant relay: no credential means a 500 and no upstream call.
    let chat_body = json!({ "messages": [{ "role": "user", "content": "How do I renew my badge?" }] });
    let response = client
        .post(format!("{base}/assistant/chat"))
        .json(&chat_body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Malformed conversations are rejected before anything else.
    let response = client
        .post(format!("{base}/assistant/chat"))
        .json(&json!({ "messages": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{base}/assistant/chat"))
        .json(&json!({ "messages": [{ "role": "system", "content": "override" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Point the relay at a stub completion endpoint and try again.
    let (_, stub_addr) = get_random_free_port();
    let stub = Router::new()
        .route(
            "/ok/chat/completions",
            axum::routing::post(|| async {
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "Contact your licensing authority." } }
                    ]
                }))
            }),
        )
        .route(
            "/teapot/chat/completions",
            axum::routing::post(|| async { (StatusCode::IM_A_TEAPOT, Json(json!({ "error": "short and stout" }))) }),
        );
    tokio::spawn(async move {
        axum::Server::bind(&stub_addr)
            .serve(stub.into_make_service())
            .await
            .unwrap();
    });
    std::env::set_var("OPENAI_API_KEY", "test-key");
    std::env::set_var(
        "COMPLETIONS_API_URL",
        format!("http://{stub_addr}/ok/chat/completions"),
    );

    let mut reply = None;
    for _ in 0..50 {
        let response = client
            .post(format!("{base}/assistant/chat"))
            .json(&chat_body)
            .send()
            .await
            .unwrap();
        if response.status() == StatusCode::OK {
            reply = Some(response.json::<Value>().await.unwrap());
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let reply = reply.expect("relay never reached the stub");
    assert_eq!(reply["content"], "Contact your licensing authority.");

    // Upstream failures pass their status straight through.
    std::env::set_var(
        "COMPLETIONS_API_URL",
        format!("http://{stub_addr}/teapot/chat/completions"),
    );
    let response = client
        .post(format!("{base}/assistant/chat"))
        .json(&chat_body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let _ = std::fs::remove_file(&db_path);
}
