//! PostgreSQL-backed `AccountRepository` adapter.
//!
//! The owner row is inserted before the account row inside one transaction,
//! so a failure on either insert leaves no trace. Lookups compare on
//! `lower(...)` to match the unique indexes.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, EmailAddress, Registration, Subdomain, UserId};

use super::diesel_error_mapping::{WriteContext, map_diesel_error, map_pool_error, map_write_error};
use super::models::{AccountRow, NewAccountRow, NewUserRow};
use super::pool::DbPool;
use super::schema::{accounts, users};

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use timetracker::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/timetracker")).await?;
    /// let repository = DieselAccountRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let subdomain = Subdomain::parse(&row.subdomain).map_err(|err| {
        AccountPersistenceError::query(format!("stored subdomain {:?} is invalid: {err}", row.subdomain))
    })?;
    Ok(Account::new(
        AccountId::from_uuid(row.id),
        subdomain,
        UserId::from_uuid(row.owner_id),
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn subdomain_taken(&self, subdomain: &Subdomain) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            accounts::table.filter(lower(accounts::subdomain).eq(subdomain.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(users::table.filter(lower(users::email).eq(email.as_ref()))))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn create_with_owner(
        &self,
        registration: &Registration,
    ) -> Result<(), AccountPersistenceError> {
        let owner = registration.owner();
        let account = registration.account();
        let new_user = NewUserRow {
            id: *owner.id().as_uuid(),
            name: owner.name().as_ref(),
            email: owner.email().as_ref(),
            password_hash: owner.password_hash().as_ref(),
        };
        let new_account = NewAccountRow {
            id: *account.id().as_uuid(),
            subdomain: account.subdomain().as_ref(),
            owner_id: *account.owner_id().as_uuid(),
        };
        let context = WriteContext {
            subdomain: Some(account.subdomain().as_ref()),
            email: Some(owner.email().as_ref()),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)
                    .await?;
                diesel::insert_into(accounts::table)
                    .values(&new_account)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_write_error(err, context))?;

        debug!(account_id = %account.id(), "account and owner inserted");
        Ok(())
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = accounts::table
            .filter(lower(accounts::subdomain).eq(subdomain.as_ref()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }
}
