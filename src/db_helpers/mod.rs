use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Profile};

mod blog_helpers;
mod comment_helpers;
mod directory_helpers;
mod feedback_helpers;
mod news_helpers;
mod post_helpers;
mod profile_helpers;

pub use blog_helpers::*;
pub use comment_helpers::*;
pub use directory_helpers::*;
pub use feedback_helpers::*;
pub use news_helpers::*;
pub use post_helpers::*;
pub use profile_helpers::*;

const PROFILE_COLUMNS: &str = "id, email, password, name, region, phone, licence_type, \
     years_experience, avatar_url, is_admin, created_at";

/// Collects `column = ?` assignments for a partial UPDATE, skipping columns
/// the caller did not send. `touch` adds a raw assignment with no parameter.
struct UpdateBuilder {
    assignments: Vec<String>,
    params: Vec<String>,
}

impl UpdateBuilder {
    fn new() -> Self {
        Self {
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    fn set(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.assignments.push(format!("{column} = ?"));
            self.params.push(value);
        }
        self
    }

    fn touch(mut self, assignment: &'static str) -> Self {
        self.assignments.push(assignment.to_string());
        self
    }

    fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn build(self, table: &str, filter: &str) -> (String, Vec<String>) {
        let assignments = self.assignments.join(", ");
        (
            format!("UPDATE {table} SET {assignments} WHERE {filter}"),
            self.params,
        )
    }
}

// ----------------- Shared Lookups -----------------

pub async fn get_profile_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Profile>, RequestError> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, Profile>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_profile_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Profile>, RequestError> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
    let result = sqlx::query_as::<Sqlite, Profile>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Authorization happens here, against the profile row, not against anything
/// the client sent.
pub async fn require_admin(pool: &SqlitePool, user_id: i64) -> Result<Profile, RequestError> {
    let profile = match get_profile_by_id(pool, user_id).await? {
        Some(profile) => profile,
        None => return Err(RequestError::NotAuthorized("Sign in to continue")),
    };
    if !profile.is_admin {
        return Err(RequestError::Forbidden);
    }
    Ok(profile)
}
