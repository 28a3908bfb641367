//! Signup input, validation rules and the validated registration.
//!
//! [`SignupRequest::validate`] is pure: it never touches storage and always
//! reports every failing field, so a form can be redisplayed with all of its
//! errors at once. Uniqueness is checked later by the
//! [`SignupService`](crate::domain::SignupService).

use std::fmt;

use crate::domain::account::{Account, AccountId, Subdomain};
use crate::domain::user::{
    EmailAddress, Password, PasswordHash, User, UserId, UserName, UserValidationError,
};

/// Longest password accepted regardless of configuration.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Minimum password length used by debug builds and tests.
pub const DEBUG_PASSWORD_MIN_LENGTH: usize = 2;

/// Minimum password length used by release builds.
pub const RELEASE_PASSWORD_MIN_LENGTH: usize = 8;

/// Input fields that can carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Subdomain,
    Owner,
    OwnerName,
    OwnerEmail,
    OwnerPassword,
    OwnerPasswordConfirmation,
}

impl Field {
    /// Dotted key used by adapters to place the message next to its input.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::Owner => "owner",
            Self::OwnerName => "owner.name",
            Self::OwnerEmail => "owner.email",
            Self::OwnerPassword => "owner.password",
            Self::OwnerPasswordConfirmation => "owner.password_confirmation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: Field,
    message: String,
}

impl FieldError {
    /// Pair a message with the field it belongs to.
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The offending field.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Human-readable message, e.g. `can't be blank`.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered collection of field errors.
///
/// # Examples
/// ```
/// use timetracker::domain::ValidationErrors;
/// use timetracker::domain::signup::Field;
///
/// let mut errors = ValidationErrors::default();
/// errors.add(Field::Subdomain, "restricted");
/// assert_eq!(errors.messages_for(Field::Subdomain).collect::<Vec<_>>(), ["restricted"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Record a message against `field`.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Build a collection holding a single error.
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when `field` has at least one message.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Messages recorded for `field`, in insertion order.
    pub fn messages_for(&self, field: Field) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |error| error.field == field)
            .map(FieldError::message)
    }

    /// Iterate over every field error.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        match value() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Password length bounds applied during signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    /// Policy with the given minimum and the fixed maximum.
    ///
    /// A minimum above the maximum is clamped to the maximum.
    #[must_use]
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length: min_length.clamp(1, PASSWORD_MAX_LENGTH),
            max_length: PASSWORD_MAX_LENGTH,
        }
    }

    /// Minimum accepted length in characters.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check the length bounds of an already non-blank password.
    pub fn check(&self, password: &Password) -> Result<(), UserValidationError> {
        let length = password.char_len();
        if length < self.min_length {
            return Err(UserValidationError::PasswordTooShort {
                min: self.min_length,
            });
        }
        if length > self.max_length {
            return Err(UserValidationError::PasswordTooLong {
                max: self.max_length,
            });
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::with_min_length(RELEASE_PASSWORD_MIN_LENGTH)
    }
}

/// Raw owner fields as submitted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OwnerInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for OwnerInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Raw nested signup submission.
///
/// `owner` is optional so adapters can express a submission that carries no
/// owner at all; validation rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupRequest {
    pub subdomain: String,
    pub owner: Option<OwnerInput>,
}

/// Owner fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOwner {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

/// Signup input that passed every storage-independent rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSignup {
    pub subdomain: Subdomain,
    pub owner: ValidatedOwner,
}

fn record<T>(
    errors: &mut ValidationErrors,
    field: Field,
    result: Result<T, impl fmt::Display>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.add(field, error.to_string());
            None
        }
    }
}

impl SignupRequest {
    /// Validate the whole submission, collecting every field error.
    ///
    /// # Examples
    /// ```
    /// use timetracker::domain::{OwnerInput, PasswordPolicy, SignupRequest};
    /// use timetracker::domain::signup::Field;
    ///
    /// let request = SignupRequest {
    ///     subdomain: "www".into(),
    ///     owner: Some(OwnerInput {
    ///         name: "Ryan".into(),
    ///         email: "ryan@example.com".into(),
    ///         password: "pw12".into(),
    ///         password_confirmation: "pw12".into(),
    ///     }),
    /// };
    /// let errors = request
    ///     .validate(&PasswordPolicy::with_min_length(2))
    ///     .unwrap_err();
    /// assert!(errors.has(Field::Subdomain));
    /// ```
    pub fn validate(&self, policy: &PasswordPolicy) -> Result<ValidatedSignup, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let subdomain = record(&mut errors, Field::Subdomain, Subdomain::parse(&self.subdomain));
        let owner = match &self.owner {
            Some(owner) => validate_owner(owner, policy, &mut errors),
            None => {
                errors.add(Field::Owner, "can't be blank");
                None
            }
        };

        errors.into_result(|| {
            Some(ValidatedSignup {
                subdomain: subdomain?,
                owner: owner?,
            })
        })
    }
}

fn validate_owner(
    owner: &OwnerInput,
    policy: &PasswordPolicy,
    errors: &mut ValidationErrors,
) -> Option<ValidatedOwner> {
    let name = record(errors, Field::OwnerName, UserName::new(&owner.name));
    let email = record(errors, Field::OwnerEmail, EmailAddress::new(&owner.email));
    let password = record(
        errors,
        Field::OwnerPassword,
        Password::new(owner.password.as_str())
            .and_then(|password| policy.check(&password).map(|()| password)),
    );
    if owner.password != owner.password_confirmation {
        errors.add(Field::OwnerPasswordConfirmation, "doesn't match Password");
    }

    Some(ValidatedOwner {
        name: name?,
        email: email?,
        password: password?,
    })
}

/// An unsaved account together with its unsaved owner.
///
/// ## Invariants
/// - `account.owner_id() == owner.id()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    account: Account,
    owner: User,
}

impl Registration {
    /// Build a registration with fresh identifiers from validated input.
    #[must_use]
    pub fn from_validated(
        subdomain: Subdomain,
        name: UserName,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Self {
        let owner = User::new(UserId::random(), name, email, password_hash);
        let account = Account::new(AccountId::random(), subdomain, owner.id());
        Self { account, owner }
    }

    /// The account to insert.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The owner to insert first.
    #[must_use]
    pub fn owner(&self) -> &User {
        &self.owner
    }
}
