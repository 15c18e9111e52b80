use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::{Account, AccountStore, StoreError};
use crate::config::DatabaseConfig;

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, number, balance, created_at";

/// Postgres-backed account store
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool against `config.url`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let connection_string = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let url = url::Url::parse(connection_string).map_err(|_| StoreError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(connection_string)
            .await?;

        info!(
            "Created database pool for {}{}",
            url.host_str().unwrap_or("localhost"),
            url.path()
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn init(&self) -> Result<(), StoreError> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS account (
                id BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL,
                last_name VARCHAR(50) NOT NULL,
                number BIGINT NOT NULL,
                balance BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL
            )
        "#;

        sqlx::query(query).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(&self, account: Account) -> Result<Account, StoreError> {
        let query = format!(
            "INSERT INTO account (first_name, last_name, number, balance, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let created = sqlx::query_as::<_, Account>(&query)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.number)
            .bind(account.balance)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE account SET first_name = $1, last_name = $2, balance = $3 WHERE id = $4",
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.balance)
        .bind(account.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(account.id));
        }
        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let query = format!("SELECT {} FROM account ORDER BY id", ACCOUNT_COLUMNS);
        let accounts = sqlx::query_as::<_, Account>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        let query = format!("SELECT {} FROM account WHERE id = $1", ACCOUNT_COLUMNS);
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
