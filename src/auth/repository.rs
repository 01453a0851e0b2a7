// Account directory: the persistence seam of the identity core

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::auth::{
    error::AuthError,
    models::{Account, AccountStatus, NewAccount},
};

const ACCOUNT_COLUMNS: &str = "id, user_name, email, password_hash, phone_number, status, role, \
                               created_at, updated_at, deleted_at";

/// Lookup and creation of account records
///
/// Emails compare case-insensitively and soft-deleted accounts are never
/// returned. `create` assigns the id and both timestamps.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AuthError>;
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError>;
}

/// PostgreSQL-backed account directory
#[derive(Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AuthError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE id = $1 AND deleted_at IS NULL",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        let query = format!(
            "INSERT INTO accounts (user_name, email, password_hash, phone_number, status, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&account.user_name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.phone_number)
            .bind(account.status)
            .bind(account.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // A concurrent signup can win the race past the lookup
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::DuplicateAccount;
                    }
                }
                AuthError::from(e)
            })
    }
}

/// In-memory account directory for development and tests
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change an account's status, returning false when no such account exists
    pub async fn set_status(&self, id: i32, status: AccountStatus) -> bool {
        self.update(id, |account| account.status = status).await
    }

    /// Mark an account deleted without removing the record
    pub async fn soft_delete(&self, id: i32) -> bool {
        self.update(id, |account| account.deleted_at = Some(Utc::now())).await
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    async fn update(&self, id: i32, apply: impl FnOnce(&mut Account)) -> bool {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|account| account.id == id) {
            Some(account) => {
                apply(account);
                account.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.deleted_at.is_none() && account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.deleted_at.is_none() && account.id == id)
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.write().await;
        // Same guarantee as the unique index on LOWER(email)
        if accounts.iter().any(|existing| existing.email.eq_ignore_ascii_case(&account.email)) {
            return Err(AuthError::DuplicateAccount);
        }

        let now = Utc::now();
        let created = Account {
            id: accounts.len() as i32 + 1,
            user_name: account.user_name,
            email: account.email,
            password_hash: account.password_hash,
            phone_number: account.phone_number,
            status: account.status,
            role: account.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        accounts.push(created.clone());
        Ok(created)
    }
}
