use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::UpdateProfileRequest,
    errors::RequestError,
    models::Profile,
};

use super::{get_profile_by_id, UpdateBuilder, PROFILE_COLUMNS};

/// Inserts a fresh profile. The password must already be hashed and the
/// region already validated against the enumeration.
pub async fn insert_profile(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
    region: &str,
) -> Result<Profile, RequestError> {
    let query = format!(
        "INSERT INTO profiles (email, password, name, region) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {PROFILE_COLUMNS}"
    );
    let profile = sqlx::query_as::<Sqlite, Profile>(&query)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(region)
        .fetch_one(pool)
        .await?;
    Ok(profile)
}

pub async fn update_profile_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateProfileRequest {
        name,
        region,
        phone,
        licence_type,
        years_experience,
        avatar_url,
    }: UpdateProfileRequest,
) -> Result<Profile, RequestError> {
    let builder = UpdateBuilder::new()
        .set("name", name)
        .set("region", region)
        .set("phone", phone)
        .set("licence_type", licence_type)
        .set(
            "years_experience",
            years_experience.map(|years| years.to_string()),
        )
        .set("avatar_url", avatar_url);

    if !builder.is_empty() {
        let (query, params) = builder.build("profiles", "id = ?");
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(pool).await?;
    }

    match get_profile_by_id(pool, id).await? {
        Some(profile) => Ok(profile),
        None => Err(RequestError::NotFound("Profile not found")),
    }
}
