use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use voyage_core::booking::{Booking, BookingDetails, NewBooking};
use voyage_core::listing::Listing;
use voyage_core::repository::{BookingRepository, RepoError};
use voyage_core::user::User;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    user_id: i64,
    listing_id: i64,
    destination: String,
    date: NaiveDate,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            listing_id: row.listing_id,
            destination: row.destination,
            date: row.date,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

// Flattened booking + guest + listing
#[derive(sqlx::FromRow)]
struct BookingDetailsRow {
    id: i64,
    user_id: i64,
    listing_id: i64,
    destination: String,
    date: NaiveDate,
    price: Decimal,
    created_at: DateTime<Utc>,
    user_email: String,
    user_first_name: String,
    user_last_name: String,
    user_created_at: DateTime<Utc>,
    listing_title: String,
    listing_description: String,
    listing_location: String,
    listing_price_per_night: Decimal,
    listing_created_at: DateTime<Utc>,
    listing_updated_at: DateTime<Utc>,
}

impl From<BookingDetailsRow> for BookingDetails {
    fn from(row: BookingDetailsRow) -> Self {
        BookingDetails {
            user: User {
                id: row.user_id,
                email: row.user_email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                created_at: row.user_created_at,
            },
            listing: Listing {
                id: row.listing_id,
                title: row.listing_title,
                description: row.listing_description,
                location: row.listing_location,
                price_per_night: row.listing_price_per_night,
                created_at: row.listing_created_at,
                updated_at: row.listing_updated_at,
            },
            booking: Booking {
                id: row.id,
                user_id: row.user_id,
                listing_id: row.listing_id,
                destination: row.destination,
                date: row.date,
                price: row.price,
                created_at: row.created_at,
            },
        }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, listing_id, destination, date, price, created_at";

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError> {
        let sql = format!(
            "INSERT INTO bookings (user_id, listing_id, destination, date, price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOKING_COLUMNS
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(booking.user_id)
            .bind(booking.listing_id)
            .bind(&booking.destination)
            .bind(booking.date)
            .bind(booking.price)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError> {
        let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn get_booking_details(&self, id: i64) -> Result<Option<BookingDetails>, RepoError> {
        let row = sqlx::query_as::<_, BookingDetailsRow>(
            r#"
            SELECT b.id, b.user_id, b.listing_id, b.destination, b.date, b.price, b.created_at,
                   u.email AS user_email,
                   u.first_name AS user_first_name,
                   u.last_name AS user_last_name,
                   u.created_at AS user_created_at,
                   l.title AS listing_title,
                   l.description AS listing_description,
                   l.location AS listing_location,
                   l.price_per_night AS listing_price_per_night,
                   l.created_at AS listing_created_at,
                   l.updated_at AS listing_updated_at
            FROM bookings b
            JOIN users u ON u.id = b.user_id
            JOIN listings l ON l.id = b.listing_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError> {
        let sql = format!("SELECT {} FROM bookings ORDER BY id", BOOKING_COLUMNS);
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_booking(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
