use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::CreateCompanyRequest;
use crate::errors::RequestError;
use crate::models::Company;

const COMPANY_COLUMNS: &str = "id, name, category, description, website_url, phone, region";

pub async fn list_companies_in_db(
    pool: &SqlitePool,
    category: Option<&str>,
) -> Result<Vec<Company>, RequestError> {
    let query = format!(
        "SELECT {COMPANY_COLUMNS} FROM marketplace_companies \
         WHERE $1 IS NULL OR category = $1 \
         ORDER BY name ASC"
    );
    let companies = sqlx::query_as::<Sqlite, Company>(&query)
        .bind(category)
        .fetch_all(pool)
        .await?;
    Ok(companies)
}

pub async fn insert_company_in_db(
    pool: &SqlitePool,
    CreateCompanyRequest {
        name,
        category,
        description,
        website_url,
        phone,
        region,
    }: CreateCompanyRequest,
) -> Result<Company, RequestError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::RunTimeError("Company name must not be empty"));
    }
    let query = format!(
        "INSERT INTO marketplace_companies (name, category, description, website_url, phone, region) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {COMPANY_COLUMNS}"
    );
    let company = sqlx::query_as::<Sqlite, Company>(&query)
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(website_url)
        .bind(phone)
        .bind(region)
        .fetch_one(pool)
        .await?;
    Ok(company)
}
