pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use models::Account;
pub use postgres::PostgresStore;

/// Errors from an account store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account {0} was not found")]
    NotFound(i64),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// CRUD over account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the backing table if needed
    async fn init(&self) -> Result<(), StoreError>;

    /// Persist a new account and return it with its assigned id
    async fn create_account(&self, account: Account) -> Result<Account, StoreError>;

    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    /// Update names and balance. The account number is left untouched.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
