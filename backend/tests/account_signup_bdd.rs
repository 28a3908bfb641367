//! Behaviour tests for the signup workflow.
//!
//! Scenarios drive [`SignupService`] over the in-memory store, so they run
//! without a database.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use timetracker::domain::ports::{AccountRepository, FixturePasswordHasher};
use timetracker::domain::signup::Field;
use timetracker::domain::{
    OwnerInput, PasswordPolicy, SignupError, SignupReceipt, SignupRequest, SignupService,
    Subdomain, ValidationErrors,
};
use timetracker::outbound::memory::InMemoryAccountRepository;
use tokio::runtime::Runtime;

struct SignupWorld {
    runtime: Runtime,
    store: Arc<InMemoryAccountRepository>,
    service: SignupService,
    request: RefCell<SignupRequest>,
    outcome: RefCell<Option<Result<SignupReceipt, SignupError>>>,
}

impl SignupWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let store = Arc::new(InMemoryAccountRepository::default());
        let service = SignupService::new(
            store.clone(),
            Arc::new(FixturePasswordHasher),
            PasswordPolicy::with_min_length(2),
        );
        Self {
            runtime,
            store,
            service,
            request: RefCell::new(SignupRequest::default()),
            outcome: RefCell::new(None),
        }
    }

    fn submit(&self, request: SignupRequest) -> Result<SignupReceipt, SignupError> {
        self.runtime.block_on(self.service.sign_up(request))
    }

    fn edit_owner(&self, edit: impl FnOnce(&mut OwnerInput)) {
        let mut request = self.request.borrow_mut();
        edit(request.owner.get_or_insert_with(OwnerInput::default));
    }

    fn with_rejection<F>(&self, f: F)
    where
        F: FnOnce(&ValidationErrors),
    {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("signup should have been submitted") {
            Err(SignupError::Rejected(errors)) => f(errors),
            other => panic!("expected a rejected signup, got {other:?}"),
        }
    }
}

fn signup_form(name: &str, subdomain: &str, email: &str) -> SignupRequest {
    SignupRequest {
        subdomain: subdomain.to_owned(),
        owner: Some(OwnerInput {
            name: name.to_owned(),
            email: email.to_owned(),
            password: "pw12".into(),
            password_confirmation: "pw12".into(),
        }),
    }
}

fn field_named(name: &str) -> Field {
    [
        Field::Subdomain,
        Field::Owner,
        Field::OwnerName,
        Field::OwnerEmail,
        Field::OwnerPassword,
        Field::OwnerPasswordConfirmation,
    ]
    .into_iter()
    .find(|field| field.as_str() == name)
    .unwrap_or_else(|| panic!("unknown field {name}"))
}

#[fixture]
fn world() -> SignupWorld {
    SignupWorld::new()
}

#[given("an existing account {subdomain} owned by {email}")]
fn an_existing_account(world: &SignupWorld, subdomain: String, email: String) {
    world
        .submit(signup_form("Sam", &subdomain, &email))
        .expect("existing account should be created");
}

#[given("a signup form for {name} claiming {subdomain}")]
fn a_signup_form(world: &SignupWorld, name: String, subdomain: String) {
    *world.request.borrow_mut() = signup_form(&name, &subdomain, "ryan@example.com");
}

#[given("the owner email is {email}")]
fn the_owner_email_is(world: &SignupWorld, email: String) {
    world.edit_owner(|owner| owner.email = email);
}

#[given("the password confirmation is {confirmation}")]
fn the_password_confirmation_is(world: &SignupWorld, confirmation: String) {
    world.edit_owner(|owner| owner.password_confirmation = confirmation);
}

#[when("the signup is submitted")]
fn the_signup_is_submitted(world: &SignupWorld) {
    let request = world.request.borrow().clone();
    let outcome = world.submit(request);
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the account {subdomain} is created with its owner")]
fn the_account_is_created(world: &SignupWorld, subdomain: String) {
    let outcome = world.outcome.borrow();
    let receipt = outcome
        .as_ref()
        .expect("signup should have been submitted")
        .as_ref()
        .expect("signup should succeed");
    assert_eq!(receipt.subdomain().as_ref(), subdomain);

    let subdomain = Subdomain::parse(&subdomain).expect("valid subdomain");
    let account = world
        .runtime
        .block_on(world.store.find_by_subdomain(&subdomain))
        .expect("lookup should succeed")
        .expect("account should be stored");
    let owner = world.store.owner_of(&account).expect("owner should be stored");
    assert_eq!(owner.id(), receipt.owner_id());
    assert_eq!(account.id(), receipt.account_id());
}

#[then("the {field} field reports {message}")]
fn the_field_reports(world: &SignupWorld, field: String, message: String) {
    let field = field_named(&field);
    world.with_rejection(|errors| {
        assert!(
            errors.messages_for(field).any(|found| found == message),
            "expected `{message}` on {field}, got {errors}"
        );
    });
}

#[then("the account count is {count}")]
fn the_account_count_is(world: &SignupWorld, count: usize) {
    assert_eq!(world.store.account_count(), count);
    assert_eq!(world.store.user_count(), count);
}

#[scenario(
    path = "tests/features/account_signup.feature",
    name = "A new tenant signs up"
)]
fn a_new_tenant_signs_up(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_signup.feature",
    name = "The www subdomain is restricted"
)]
fn the_www_subdomain_is_restricted(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_signup.feature",
    name = "Subdomains are unique regardless of case"
)]
fn subdomains_are_unique_regardless_of_case(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_signup.feature",
    name = "Owner emails are unique regardless of case"
)]
fn owner_emails_are_unique_regardless_of_case(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_signup.feature",
    name = "A mismatched confirmation saves nothing"
)]
fn a_mismatched_confirmation_saves_nothing(world: SignupWorld) {
    drop(world);
}
