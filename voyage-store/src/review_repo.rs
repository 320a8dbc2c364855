use async_trait::async_trait;
use sqlx::PgPool;
use voyage_core::repository::{RepoError, ReviewRepository};
use voyage_core::review::{Review, ReviewInput};

pub struct StoreReviewRepository {
    pool: PgPool,
}

impl StoreReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    listing_id: i64,
    user_id: i64,
    rating: i16,
    comment: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            listing_id: row.listing_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

const REVIEW_COLUMNS: &str = "id, listing_id, user_id, rating, comment, created_at";

#[async_trait]
impl ReviewRepository for StoreReviewRepository {
    async fn create_review(&self, review: &ReviewInput) -> Result<Review, RepoError> {
        let sql = format!(
            "INSERT INTO reviews (listing_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            REVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review.listing_id)
            .bind(review.user_id)
            .bind(review.rating)
            .bind(&review.comment)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>, RepoError> {
        let sql = format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS);
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, RepoError> {
        let sql = format!("SELECT {} FROM reviews ORDER BY id", REVIEW_COLUMNS);
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_review(
        &self,
        id: i64,
        review: &ReviewInput,
    ) -> Result<Option<Review>, RepoError> {
        let sql = format!(
            "UPDATE reviews SET listing_id = $2, user_id = $3, rating = $4, comment = $5 \
             WHERE id = $1 RETURNING {}",
            REVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .bind(review.listing_id)
            .bind(review.user_id)
            .bind(review.rating)
            .bind(&review.comment)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_review(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
