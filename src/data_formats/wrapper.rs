use serde::{Deserialize, Serialize};

use super::response::{
    BlogPostResponse, CommentResponse, CompanyResponse, FeedbackResponse, NewsResponse,
    PostResponse, ProfileResponse,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileWrapper {
    pub profile: ProfileResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostWrapper<T> {
    pub post: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePostsWrapper {
    pub posts: Vec<PostResponse>,
    #[serde(rename = "postsCount")]
    pub posts_count: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BlogPostWrapper {
    #[serde(rename = "blogPost")]
    pub blog_post: BlogPostResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleBlogPostsWrapper {
    #[serde(rename = "blogPosts")]
    pub blog_posts: Vec<BlogPostResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleNewsWrapper {
    pub news: Vec<NewsResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCompaniesWrapper {
    pub companies: Vec<CompanyResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FeedbackWrapper {
    pub feedback: FeedbackResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleFeedbackWrapper {
    pub feedback: Vec<FeedbackResponse>,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(user: T) -> UserWrapper<T> {
        UserWrapper { user }
    }
}
