use async_trait::async_trait;
use sqlx::PgPool;
use voyage_core::repository::{RepoError, UserRepository};
use voyage_core::user::{NewUser, User};

pub struct StoreUserRepository {
    pool: PgPool,
}

impl StoreUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, first_name, last_name, created_at
            "#,
        )
        .bind(user.email.trim())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, first_name, last_name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, first_name, last_name, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
