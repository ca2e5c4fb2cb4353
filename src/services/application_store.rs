use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::application::{Application, NewApplication};

/// Append-only storage for submitted applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Creates the schema if needed. Safe to call on every start.
    async fn initialize(&self) -> Result<()>;

    /// Stores a submission and returns its newly assigned id.
    async fn insert(&self, application: &NewApplication) -> Result<i64>;

    /// All applications, newest first.
    async fn list_all(&self) -> Result<Vec<Application>>;
}

#[derive(Clone)]
pub struct SqliteApplicationStore {
    pool: SqlitePool,
}

impl SqliteApplicationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ApplicationStore for SqliteApplicationStore {
    async fn initialize(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, application: &NewApplication) -> Result<i64> {
        // execute() steps the statement to completion, so the row is committed
        // before the id is handed back.
        let result = sqlx::query(
            r#"
            INSERT INTO applications (full_name, email, phone, position, experience, bio)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.position)
        .bind(application.experience)
        .bind(&application.bio)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_all(&self) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, full_name, email, phone, position, experience, bio, submitted_at
            FROM applications
            ORDER BY submitted_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }
}
