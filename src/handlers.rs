use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    assistant::relay_chat,
    authentication::{hash_password, issue_token, verify_password, AuthUser, MaybeUser},
    data_formats::{
        ChatRequest, ChatResponse, CommentRequest, CreateBlogPostRequest, CreateCompanyRequest,
        CreateNewsRequest, CreatePostRequest, DirectoryQueryParams, FeedQueryParams, FeedScope,
        FeedbackRequest, LoginRequest, RegisterRequest, UpdateBlogPostRequest,
        UpdateProfileRequest,
    },
    db_helpers::{
        add_comment_in_db, create_blog_post_in_db, create_post_in_db, delete_blog_post_in_db,
        get_blog_post_by_slug_in_db, get_post_in_db, get_profile_by_email, get_profile_by_id,
        insert_company_in_db, insert_feedback_in_db, insert_news_in_db, insert_profile,
        list_blog_posts_in_db, list_comments_in_db, list_companies_in_db, list_feed_in_db,
        list_feedback_in_db, list_news_in_db, require_admin, toggle_like_in_db,
        update_blog_post_in_db, update_profile_in_db,
    },
    errors::{RequestError, RequestErrorJson},
    models::Region,
    BlogPostResponse, BlogPostWrapper, CommentResponse, CommentWrapper, CompanyResponse,
    FeedbackResponse, FeedbackWrapper, MultipleBlogPostsWrapper, MultipleCommentsWrapper,
    MultipleCompaniesWrapper, MultipleFeedbackWrapper, MultipleNewsWrapper, MultiplePostsWrapper,
    NewsResponse, PostResponse, PostWrapper, ProfileResponse, ProfileWrapper, UserResponse,
    UserWrapper,
};

type UserJson = UserWrapper<UserResponse>;

type JsonResult<T> = Result<Json<T>, (StatusCode, Json<RequestErrorJson>)>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<RequestErrorJson>) {
    (
        StatusCode::NOT_FOUND,
        Json(RequestErrorJson::new(&format!("URL {uri} was not found"))),
    )
}

// ----------------- User Handlers -----------------
pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<RegisterRequest>,
) -> JsonResult<UserJson> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(RequestError::RunTimeError("Name must not be empty").to_json_response());
    }
    let region = match Region::parse(&request.region) {
        Some(region) => region,
        None => return Err(RequestError::RunTimeError("Unknown region").to_json_response()),
    };
    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(RequestError::RunTimeError("Email must not be empty").to_json_response());
    }

    let password_hash = hash_password(request.password).await.map_err(|_| {
        RequestError::RunTimeError("Could not register\nPlease try again").to_json_response()
    })?;

    let profile = insert_profile(&pool, &email, &password_hash, name, region.as_str())
        .await
        .map_err(|e| {
            if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &e {
                if e.message().contains("UNIQUE constraint failed") {
                    return RequestError::RunTimeError("Email already exists").to_json_response();
                }
            }
            e.to_json_response()
        })?;

    let token = issue_token(profile.id).map_err(|_| RequestError::ServerError.to_json_response())?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        profile, token,
    ))))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<LoginRequest>,
) -> JsonResult<UserJson> {
    let profile = get_profile_by_email(&pool, request.email.trim().to_lowercase().as_str())
        .await
        .map_err(|e| e.to_json_response())?;
    let profile = match profile {
        Some(profile) => profile,
        None => return Err(RequestError::RunTimeError("Email not found").to_json_response()),
    };

    let is_password_correct = verify_password(request.password, profile.password.clone())
        .await
        .map_err(|_| {
            RequestError::RunTimeError("Could not sign in\nPlease try again").to_json_response()
        })?;
    if !is_password_correct {
        return Err(RequestError::RunTimeError("Incorrect password").to_json_response());
    }

    let token = issue_token(profile.id).map_err(|_| RequestError::ServerError.to_json_response())?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        profile, token,
    ))))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id, token }: AuthUser,
) -> JsonResult<UserJson> {
    let profile = get_profile_by_id(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    let profile = match profile {
        Some(profile) => profile,
        None => return Err(RequestError::NotFound("Profile not found").to_json_response()),
    };
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        profile, token,
    ))))
}

pub async fn update_profile(
    AuthUser { id, token }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(mut request): Json<UpdateProfileRequest>,
) -> JsonResult<UserJson> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(RequestError::RunTimeError("Name must not be empty").to_json_response());
        }
    }
    if let Some(region) = &request.region {
        match Region::parse(region) {
            // Stored in canonical spelling regardless of how it was typed.
            Some(region) => request.region = Some(region.as_str().to_string()),
            None => return Err(RequestError::RunTimeError("Unknown region").to_json_response()),
        }
    }
    if let Some(years) = request.years_experience {
        if !(0..=80).contains(&years) {
            return Err(
                RequestError::RunTimeError("Years of experience is out of range")
                    .to_json_response(),
            );
        }
    }

    let profile = update_profile_in_db(&pool, id, request)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        profile, token,
    ))))
}

// ----------------- Profile Handlers -----------------
pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<ProfileWrapper> {
    let profile = get_profile_by_id(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    match profile {
        Some(profile) => Ok(Json(ProfileWrapper {
            profile: ProfileResponse::new(profile),
        })),
        None => Err(RequestError::NotFound("Profile not found").to_json_response()),
    }
}

// ----------------- Feed Handlers -----------------
pub async fn create_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreatePostRequest>,
) -> JsonResult<PostWrapper<PostResponse>> {
    let post = create_post_in_db(&pool, id, request)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post),
    }))
}

pub async fn list_feed(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Query(FeedQueryParams {
        scope,
        limit,
        offset,
    }): Query<FeedQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let viewer = maybe_user.get_id();
    let region = match scope {
        FeedScope::All => None,
        FeedScope::Mine => {
            let id = match viewer {
                Some(id) => id,
                None => {
                    return Err(
                        RequestError::NotAuthorized("Sign in to continue").to_json_response()
                    )
                }
            };
            let profile = get_profile_by_id(&pool, id)
                .await
                .map_err(|e| e.to_json_response())?;
            match profile.and_then(|profile| profile.region) {
                Some(region) => Some(region),
                None => {
                    return Err(RequestError::RunTimeError(
                        "Set your region to use the regional feed",
                    )
                    .to_json_response())
                }
            }
        }
    };

    let posts = list_feed_in_db(&pool, viewer, region.as_deref(), limit, offset)
        .await
        .map_err(|e| e.to_json_response())?;
    let posts: Vec<PostResponse> = posts.into_iter().map(PostResponse::new).collect();
    let posts_count = posts.len();
    Ok(Json(MultiplePostsWrapper { posts, posts_count }))
}

pub async fn toggle_like(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<PostWrapper<PostResponse>> {
    toggle_like_in_db(&pool, post_id, id)
        .await
        .map_err(|e| e.to_json_response())?;
    let post = get_post_in_db(&pool, post_id, Some(id))
        .await
        .map_err(|e| e.to_json_response())?;
    match post {
        Some(post) => Ok(Json(PostWrapper {
            post: PostResponse::new(post),
        })),
        None => Err(RequestError::NotFound("Post not found").to_json_response()),
    }
}

// ----------------- Comment Handlers -----------------
pub async fn add_comment(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
    Json(CommentRequest { body }): Json<CommentRequest>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    let comment = add_comment_in_db(&pool, id, post_id, &body)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn list_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = list_comments_in_db(&pool, post_id)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleCommentsWrapper {
        comments: comments.into_iter().map(CommentResponse::new).collect(),
    }))
}

// ----------------- Blog Handlers -----------------
pub async fn list_blog_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
) -> JsonResult<MultipleBlogPostsWrapper> {
    let include_drafts = is_admin(&pool, &maybe_user)
        .await
        .map_err(|e| e.to_json_response())?;
    let posts = list_blog_posts_in_db(&pool, include_drafts)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleBlogPostsWrapper {
        blog_posts: posts.into_iter().map(BlogPostResponse::new).collect(),
    }))
}

pub async fn get_blog_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> JsonResult<BlogPostWrapper> {
    let post = get_blog_post_by_slug_in_db(&pool, &slug)
        .await
        .map_err(|e| e.to_json_response())?;
    let post = match post {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Blog post not found").to_json_response()),
    };
    if !post.published {
        let admin = is_admin(&pool, &maybe_user)
            .await
            .map_err(|e| e.to_json_response())?;
        if !admin {
            // Drafts are invisible, not forbidden.
            return Err(RequestError::NotFound("Blog post not found").to_json_response());
        }
    }
    Ok(Json(BlogPostWrapper {
        blog_post: BlogPostResponse::new(post),
    }))
}

pub async fn create_blog_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateBlogPostRequest>,
) -> JsonResult<BlogPostWrapper> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    let post = create_blog_post_in_db(&pool, id, request)
        .await
        .map_err(|e| {
            if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &e {
                if e.message().contains("UNIQUE constraint failed") {
                    return RequestError::RunTimeError("A post with this title already exists")
                        .to_json_response();
                }
            }
            e.to_json_response()
        })?;
    Ok(Json(BlogPostWrapper {
        blog_post: BlogPostResponse::new(post),
    }))
}

pub async fn update_blog_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateBlogPostRequest>,
) -> JsonResult<BlogPostWrapper> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    let post = update_blog_post_in_db(&pool, &slug, request)
        .await
        .map_err(|e| {
            if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &e {
                if e.message().contains("UNIQUE constraint failed") {
                    return RequestError::RunTimeError("A post with this title already exists")
                        .to_json_response();
                }
            }
            e.to_json_response()
        })?;
    Ok(Json(BlogPostWrapper {
        blog_post: BlogPostResponse::new(post),
    }))
}

pub async fn delete_blog_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<serde_json::Value> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    delete_blog_post_in_db(&pool, &slug)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(serde_json::json!({})))
}

// ----------------- News Handlers -----------------
pub async fn list_news(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleNewsWrapper> {
    let news = list_news_in_db(&pool)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleNewsWrapper {
        news: news.into_iter().map(NewsResponse::new).collect(),
    }))
}

pub async fn create_news(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateNewsRequest>,
) -> JsonResult<MultipleNewsWrapper> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    insert_news_in_db(&pool, request)
        .await
        .map_err(|e| e.to_json_response())?;
    let news = list_news_in_db(&pool)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleNewsWrapper {
        news: news.into_iter().map(NewsResponse::new).collect(),
    }))
}

// ----------------- Marketplace Handlers -----------------
pub async fn list_companies(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(DirectoryQueryParams { category }): Query<DirectoryQueryParams>,
) -> JsonResult<MultipleCompaniesWrapper> {
    let companies = list_companies_in_db(&pool, category.as_deref())
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleCompaniesWrapper {
        companies: companies.into_iter().map(CompanyResponse::new).collect(),
    }))
}

pub async fn create_company(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateCompanyRequest>,
) -> JsonResult<MultipleCompaniesWrapper> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    insert_company_in_db(&pool, request)
        .await
        .map_err(|e| e.to_json_response())?;
    let companies = list_companies_in_db(&pool, None)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleCompaniesWrapper {
        companies: companies.into_iter().map(CompanyResponse::new).collect(),
    }))
}

// ----------------- Feedback Handlers -----------------
pub async fn submit_feedback(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<FeedbackRequest>,
) -> JsonResult<FeedbackWrapper> {
    let feedback = insert_feedback_in_db(&pool, id, request)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(FeedbackWrapper {
        feedback: FeedbackResponse::new(feedback),
    }))
}

pub async fn list_feedback(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleFeedbackWrapper> {
    require_admin(&pool, id)
        .await
        .map_err(|e| e.to_json_response())?;
    let feedback = list_feedback_in_db(&pool)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(MultipleFeedbackWrapper {
        feedback: feedback.into_iter().map(FeedbackResponse::new).collect(),
    }))
}

// ----------------- Assistant Handlers -----------------
pub async fn chat_with_assistant(
    Extension(client): Extension<reqwest::Client>,
    Json(request): Json<ChatRequest>,
) -> JsonResult<ChatResponse> {
    let content = relay_chat(&client, &request.messages)
        .await
        .map_err(|e| e.to_json_response())?;
    Ok(Json(ChatResponse { content }))
}

async fn is_admin(pool: &SqlitePool, maybe_user: &MaybeUser) -> Result<bool, RequestError> {
    match maybe_user.get_id() {
        Some(id) => Ok(get_profile_by_id(pool, id)
            .await?
            .map(|profile| profile.is_admin)
            .unwrap_or(false)),
        None => Ok(false),
    }
}
