//! Mutex-guarded `AccountRepository` for local runs and tests.
//!
//! Keys are the already-normalized subdomain and email, so lookups are
//! case-insensitive exactly like the PostgreSQL `lower(...)` indexes. Both
//! uniqueness checks and both inserts happen under one lock acquisition.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, EmailAddress, Registration, Subdomain, User, UserId};

#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<String, Account>,
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
}

/// Volatile account store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    store: Mutex<Store>,
}

impl InMemoryAccountRepository {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    /// Number of stored users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Owner of `account`, if stored.
    #[must_use]
    pub fn owner_of(&self, account: &Account) -> Option<User> {
        self.lock().users.get(&account.owner_id()).cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn subdomain_taken(&self, subdomain: &Subdomain) -> Result<bool, AccountPersistenceError> {
        Ok(self.lock().accounts.contains_key(subdomain.as_ref()))
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, AccountPersistenceError> {
        Ok(self.lock().emails.contains_key(email.as_ref()))
    }

    async fn create_with_owner(
        &self,
        registration: &Registration,
    ) -> Result<(), AccountPersistenceError> {
        let account = registration.account();
        let owner = registration.owner();
        let mut store = self.lock();

        if store.emails.contains_key(owner.email().as_ref()) {
            return Err(AccountPersistenceError::email_taken(owner.email().as_ref()));
        }
        if store.accounts.contains_key(account.subdomain().as_ref()) {
            return Err(AccountPersistenceError::subdomain_taken(account.subdomain().as_ref()));
        }
        if store.users.contains_key(&owner.id()) {
            return Err(AccountPersistenceError::query("duplicate user id"));
        }

        store.emails.insert(owner.email().as_ref().to_owned(), owner.id());
        store.users.insert(owner.id(), owner.clone());
        store
            .accounts
            .insert(account.subdomain().as_ref().to_owned(), account.clone());
        Ok(())
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock().accounts.get(subdomain.as_ref()).cloned())
    }
}
