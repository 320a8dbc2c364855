use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use voyage_core::listing::{Listing, ListingInput};
use voyage_core::repository::{ListingRepository, RepoError};

pub struct StoreListingRepository {
    pool: PgPool,
}

impl StoreListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    price_per_night: Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            price_per_night: row.price_per_night,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const LISTING_COLUMNS: &str =
    "id, title, description, location, price_per_night, created_at, updated_at";

#[async_trait]
impl ListingRepository for StoreListingRepository {
    async fn create_listing(&self, listing: &ListingInput) -> Result<Listing, RepoError> {
        let sql = format!(
            "INSERT INTO listings (title, description, location, price_per_night) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            LISTING_COLUMNS
        );
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.location)
            .bind(listing.price_per_night)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_listing(&self, id: i64) -> Result<Option<Listing>, RepoError> {
        let sql = format!("SELECT {} FROM listings WHERE id = $1", LISTING_COLUMNS);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RepoError> {
        let sql = format!("SELECT {} FROM listings ORDER BY id", LISTING_COLUMNS);
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_listing(
        &self,
        id: i64,
        listing: &ListingInput,
    ) -> Result<Option<Listing>, RepoError> {
        let sql = format!(
            "UPDATE listings SET title = $2, description = $3, location = $4, \
             price_per_night = $5, updated_at = NOW() WHERE id = $1 RETURNING {}",
            LISTING_COLUMNS
        );
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.location)
            .bind(listing.price_per_night)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_listing(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
