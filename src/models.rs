use chrono::NaiveDateTime;

pub const MAX_POST_CONTENT_CHARS: usize = 1000;
pub const MAX_COMMENT_CHARS: usize = 500;
pub const MAX_FEEDBACK_CHARS: usize = 2000;

/// The areas a driver can register under. Stored as their canonical
/// names in the `region` text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    London,
    SouthEast,
    SouthWest,
    EastOfEngland,
    Midlands,
    NorthWest,
    NorthEast,
    Yorkshire,
    Wales,
    Scotland,
    NorthernIreland,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::London,
        Region::SouthEast,
        Region::SouthWest,
        Region::EastOfEngland,
        Region::Midlands,
        Region::NorthWest,
        Region::NorthEast,
        Region::Yorkshire,
        Region::Wales,
        Region::Scotland,
        Region::NorthernIreland,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::London => "London",
            Region::SouthEast => "South East",
            Region::SouthWest => "South West",
            Region::EastOfEngland => "East of England",
            Region::Midlands => "Midlands",
            Region::NorthWest => "North West",
            Region::NorthEast => "North East",
            Region::Yorkshire => "Yorkshire",
            Region::Wales => "Wales",
            Region::Scotland => "Scotland",
            Region::NorthernIreland => "Northern Ireland",
        }
    }

    pub fn parse(value: &str) -> Option<Region> {
        let value = value.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub region: Option<String>,
    pub phone: Option<String>,
    pub licence_type: Option<String>,
    pub years_experience: Option<i64>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

/// A feed row: the post itself plus the author join, aggregate counts and
/// whether the viewer has liked it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedPost {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub region: Option<String>,
    pub created_at: NaiveDateTime,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_has_liked: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub author_name: String,
    pub author_avatar: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub author_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub published_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub subject: Option<String>,
    pub message: String,
    pub rating: Option<i64>,
    pub created_at: NaiveDateTime,
}
