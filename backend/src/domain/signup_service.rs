//! Domain service creating an account together with its owner.
//!
//! The service runs the pure field validation, asks the repository whether
//! the subdomain or email is already in use, hashes the password and hands a
//! [`Registration`] to the repository. A uniqueness race lost at the storage
//! layer is reported exactly like a failed pre-check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{AccountPersistenceError, AccountRepository, PasswordHasher, SignupCommand};
use crate::domain::signup::Field;
use crate::domain::{
    AccountId, EmailAddress, Error, PasswordHash, PasswordPolicy, Registration, SignupRequest,
    Subdomain, UserId, ValidatedSignup, ValidationErrors,
};

/// Flash notice shown after a successful signup.
pub const SIGNUP_NOTICE: &str = "Signed up successfully";

/// Field message for a subdomain or email already in use.
pub const TAKEN_MESSAGE: &str = "has already been taken";

/// Outcome of a failed signup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    /// The submission is invalid; nothing was persisted.
    #[error("signup rejected: {0}")]
    Rejected(ValidationErrors),
    /// An unexpected failure; nothing was persisted.
    #[error(transparent)]
    Failed(Error),
}

/// Identifiers of a freshly created account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupReceipt {
    account_id: AccountId,
    owner_id: UserId,
    subdomain: Subdomain,
}

impl SignupReceipt {
    /// New account identifier.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// New owner identifier.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Subdomain claimed by the account.
    #[must_use]
    pub fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    /// Confirmation message for the user.
    #[must_use]
    pub fn notice(&self) -> &'static str {
        SIGNUP_NOTICE
    }
}

/// Signup use-case backed by an [`AccountRepository`] and a [`PasswordHasher`].
#[derive(Clone)]
pub struct SignupService {
    repository: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    policy: PasswordPolicy,
}

impl SignupService {
    /// Wire the service to its driven ports.
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            repository,
            hasher,
            policy,
        }
    }

    /// Validate `request` and persist the account and its owner.
    pub async fn sign_up(&self, request: SignupRequest) -> Result<SignupReceipt, SignupError> {
        let outcome = request.validate(&self.policy);
        let mut errors = outcome.as_ref().err().cloned().unwrap_or_default();
        self.check_uniqueness(&request, &mut errors).await?;

        let validated = match outcome {
            Ok(validated) if errors.is_empty() => validated,
            _ => {
                info!(
                    subdomain = %request.subdomain,
                    errors = errors.len(),
                    "signup rejected"
                );
                return Err(SignupError::Rejected(errors));
            }
        };

        let password_hash = self.hash_password(&validated).await?;
        let ValidatedSignup { subdomain, owner } = validated;
        let registration = Registration::from_validated(subdomain, owner.name, owner.email, password_hash);

        self.repository
            .create_with_owner(&registration)
            .await
            .map_err(persistence_failure)?;

        let account = registration.account();
        info!(
            account_id = %account.id(),
            owner_id = %account.owner_id(),
            subdomain = %account.subdomain(),
            "account created"
        );
        Ok(SignupReceipt {
            account_id: account.id(),
            owner_id: account.owner_id(),
            subdomain: account.subdomain().clone(),
        })
    }

    /// Add `has already been taken` for every well-formed value in use.
    ///
    /// Fields that already failed validation are not queried.
    async fn check_uniqueness(
        &self,
        request: &SignupRequest,
        errors: &mut ValidationErrors,
    ) -> Result<(), SignupError> {
        if !errors.has(Field::Subdomain) {
            if let Ok(subdomain) = Subdomain::parse(&request.subdomain) {
                let taken = self
                    .repository
                    .subdomain_taken(&subdomain)
                    .await
                    .map_err(persistence_failure)?;
                if taken {
                    errors.add(Field::Subdomain, TAKEN_MESSAGE);
                }
            }
        }

        if !errors.has(Field::OwnerEmail) {
            let email = request
                .owner
                .as_ref()
                .and_then(|owner| EmailAddress::new(&owner.email).ok());
            if let Some(email) = email {
                let taken = self
                    .repository
                    .email_taken(&email)
                    .await
                    .map_err(persistence_failure)?;
                if taken {
                    errors.add(Field::OwnerEmail, TAKEN_MESSAGE);
                }
            }
        }
        Ok(())
    }

    async fn hash_password(&self, validated: &ValidatedSignup) -> Result<PasswordHash, SignupError> {
        let hasher = Arc::clone(&self.hasher);
        let password = validated.owner.password.clone();
        let joined = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                SignupError::Failed(Error::internal(format!("password hashing task failed: {err}")))
            })?;
        joined.map_err(|err| {
            error!(error = %err, "password hashing failed");
            SignupError::Failed(Error::internal(err.to_string()))
        })
    }
}

fn persistence_failure(err: AccountPersistenceError) -> SignupError {
    match err {
        AccountPersistenceError::SubdomainTaken { subdomain } => {
            warn!(%subdomain, "subdomain claimed concurrently");
            SignupError::Rejected(ValidationErrors::single(Field::Subdomain, TAKEN_MESSAGE))
        }
        AccountPersistenceError::EmailTaken { .. } => {
            warn!("owner email claimed concurrently");
            SignupError::Rejected(ValidationErrors::single(Field::OwnerEmail, TAKEN_MESSAGE))
        }
        AccountPersistenceError::Connection { message } => {
            error!(%message, "account storage unavailable");
            SignupError::Failed(Error::service_unavailable(format!(
                "account storage unavailable: {message}"
            )))
        }
        AccountPersistenceError::Query { message } => {
            error!(%message, "account storage query failed");
            SignupError::Failed(Error::internal(format!("account storage query failed: {message}")))
        }
    }
}

#[async_trait]
impl SignupCommand for SignupService {
    async fn sign_up(&self, request: SignupRequest) -> Result<SignupReceipt, SignupError> {
        SignupService::sign_up(self, request).await
    }
}
