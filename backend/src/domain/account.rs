//! Account aggregate: the tenant and its subdomain.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::domain::UserId;

/// Subdomains that can never be claimed by a tenant.
pub const RESTRICTED_SUBDOMAINS: &[&str] = &["www"];

/// Validation failures for [`Subdomain::parse`].
///
/// `Display` renders the field-level message shown next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubdomainError {
    #[error("can't be blank")]
    Blank,
    #[error("contains invalid characters")]
    InvalidCharacters,
    #[error("restricted")]
    Restricted,
}

// ASCII word characters plus hyphen; no dots, slashes or whitespace.
const SUBDOMAIN_PATTERN: &str = "^[A-Za-z0-9_-]+$";

static SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SUBDOMAIN_PATTERN)
        .unwrap_or_else(|error| panic!("invalid pattern {SUBDOMAIN_PATTERN:?}: {error}"))
});

/// Tenant subdomain, stored lowercased.
///
/// ## Invariants
/// - Non-empty and made only of `[a-z0-9_-]`.
/// - Not listed in [`RESTRICTED_SUBDOMAINS`].
///
/// Uniqueness is a storage concern and is not checked here.
///
/// # Examples
/// ```
/// use timetracker::domain::{Subdomain, SubdomainError};
///
/// assert_eq!(Subdomain::parse("Acme").unwrap().as_ref(), "acme");
/// assert_eq!(Subdomain::parse("WWW"), Err(SubdomainError::Restricted));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subdomain(String);

impl Subdomain {
    /// Lowercase the ASCII letters of `raw` and validate it.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, SubdomainError> {
        let normalized = raw.as_ref().to_ascii_lowercase();
        if normalized.trim().is_empty() {
            return Err(SubdomainError::Blank);
        }
        if !SUBDOMAIN_RE.is_match(&normalized) {
            return Err(SubdomainError::InvalidCharacters);
        }
        if RESTRICTED_SUBDOMAINS.contains(&normalized.as_str()) {
            return Err(SubdomainError::Restricted);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Subdomain> for String {
    fn from(value: Subdomain) -> Self {
        value.0
    }
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier loaded from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tenant account owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    subdomain: Subdomain,
    owner_id: UserId,
}

impl Account {
    /// Build an account from validated components.
    #[must_use]
    pub fn new(id: AccountId, subdomain: Subdomain, owner_id: UserId) -> Self {
        Self {
            id,
            subdomain,
            owner_id,
        }
    }

    /// Stable account identifier.
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Normalized subdomain.
    #[must_use]
    pub fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    /// Identifier of the owning user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bolandrm")]
    #[case("test")]
    #[case("test_subdomain")]
    #[case("acme-corp")]
    #[case("a1")]
    fn accepts_word_characters_and_hyphens(#[case] raw: &str) {
        let subdomain = Subdomain::parse(raw).expect("valid subdomain");
        assert_eq!(subdomain.as_ref(), raw);
    }

    #[rstest]
    #[case("www")]
    #[case("WWW")]
    #[case("wWw")]
    fn rejects_restricted_in_any_case(#[case] raw: &str) {
        assert_eq!(Subdomain::parse(raw), Err(SubdomainError::Restricted));
    }

    #[rstest]
    #[case(".test")]
    #[case("test/")]
    #[case("te st")]
    #[case("acme.example")]
    #[case("caf\u{e9}")]
    #[case("test\n")]
    #[case("\u{212A}acme")]
    #[case("\u{130}stanbul")]
    fn rejects_characters_outside_the_word_set(#[case] raw: &str) {
        assert_eq!(Subdomain::parse(raw), Err(SubdomainError::InvalidCharacters));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_input(#[case] raw: &str) {
        assert_eq!(Subdomain::parse(raw), Err(SubdomainError::Blank));
    }

    #[rstest]
    fn lowercases_before_validating() {
        let subdomain = Subdomain::parse("Test_Co").expect("valid subdomain");
        assert_eq!(subdomain.as_ref(), "test_co");
    }

    #[rstest]
    fn errors_render_field_messages() {
        assert_eq!(SubdomainError::Blank.to_string(), "can't be blank");
        assert_eq!(
            SubdomainError::InvalidCharacters.to_string(),
            "contains invalid characters"
        );
        assert_eq!(SubdomainError::Restricted.to_string(), "restricted");
    }
}
