use serde::{Deserialize, Serialize};

use crate::models::{BlogPost, CommentWithAuthor, Company, Feedback, FeedPost, NewsItem, Profile};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub name: String,
    pub region: Option<String>,
    pub phone: Option<String>,
    pub licence_type: Option<String>,
    pub years_experience: Option<i64>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
}

/// Public view of a driver; email and phone stay private.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub region: Option<String>,
    pub licence_type: Option<String>,
    pub years_experience: Option<i64>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostAuthor {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub content: String,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub region: Option<String>,
    pub created_at: String,
    pub author: PostAuthor,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_has_liked: bool,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub body: String,
    pub created_at: String,
    pub author: PostAuthor,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub published_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: i64,
    pub subject: Option<String>,
    pub message: String,
    pub rating: Option<i64>,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChatResponse {
    pub content: String,
}

impl UserResponse {
    pub fn new(
        Profile {
            email,
            name,
            region,
            phone,
            licence_type,
            years_experience,
            avatar_url,
            is_admin,
            ..
        }: Profile,
        token: String,
    ) -> Self {
        UserResponse {
            email,
            token,
            name,
            region,
            phone,
            licence_type,
            years_experience,
            avatar_url,
            is_admin,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        Profile {
            id,
            name,
            region,
            licence_type,
            years_experience,
            avatar_url,
            ..
        }: Profile,
    ) -> Self {
        ProfileResponse {
            id,
            name,
            region,
            licence_type,
            years_experience,
            avatar_url,
        }
    }
}

impl PostResponse {
    pub fn new(
        FeedPost {
            id,
            author_id,
            content,
            link_url,
            image_url,
            region,
            created_at,
            author_name,
            author_avatar,
            likes_count,
            comments_count,
            user_has_liked,
        }: FeedPost,
    ) -> Self {
        PostResponse {
            id,
            content,
            link_url,
            image_url,
            region,
            created_at: created_at.to_string(),
            author: PostAuthor {
                id: author_id,
                name: author_name,
                avatar: author_avatar,
            },
            likes_count,
            comments_count,
            user_has_liked,
        }
    }
}

impl CommentResponse {
    pub fn new(
        CommentWithAuthor {
            id,
            author_id,
            body,
            created_at,
            author_name,
            author_avatar,
            ..
        }: CommentWithAuthor,
    ) -> Self {
        CommentResponse {
            id,
            body,
            created_at: created_at.to_string(),
            author: PostAuthor {
                id: author_id,
                name: author_name,
                avatar: author_avatar,
            },
        }
    }
}

impl BlogPostResponse {
    pub fn new(
        BlogPost {
            id,
            slug,
            title,
            excerpt,
            body,
            image_url,
            published,
            created_at,
            updated_at,
            ..
        }: BlogPost,
    ) -> Self {
        BlogPostResponse {
            id,
            slug,
            title,
            excerpt,
            body,
            image_url,
            published,
            created_at: created_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }
}

impl NewsResponse {
    pub fn new(
        NewsItem {
            id,
            title,
            summary,
            source_url,
            published_at,
        }: NewsItem,
    ) -> Self {
        NewsResponse {
            id,
            title,
            summary,
            source_url,
            published_at: published_at.to_string(),
        }
    }
}

impl CompanyResponse {
    pub fn new(
        Company {
            id,
            name,
            category,
            description,
            website_url,
            phone,
            region,
        }: Company,
    ) -> Self {
        CompanyResponse {
            id,
            name,
            category,
            description,
            website_url,
            phone,
            region,
        }
    }
}

impl FeedbackResponse {
    pub fn new(
        Feedback {
            id,
            subject,
            message,
            rating,
            created_at,
            ..
        }: Feedback,
    ) -> Self {
        FeedbackResponse {
            id,
            subject,
            message,
            rating,
            created_at: created_at.to_string(),
        }
    }
}
