//! Account signup endpoints.
//!
//! ```text
//! GET  /accounts/new   signup form
//! POST /accounts       create the account and its owner
//! ```
//!
//! A rejected submission re-renders the form with `422 Unprocessable Entity`;
//! a successful one redirects to `/` with a notice flash.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{OwnerInput, SignupError, SignupRequest, ValidationErrors};

use super::ApiResult;
use super::flash::{Flash, FlashKind};
use super::state::HttpState;
use super::views::{SignupFormValues, new_account_page};

/// Flat form body; owner fields use Rails-style bracketed names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub subdomain: String,
    #[serde(rename = "owner[name]")]
    pub owner_name: Option<String>,
    #[serde(rename = "owner[email]")]
    pub owner_email: Option<String>,
    #[serde(rename = "owner[password]")]
    pub owner_password: Option<String>,
    #[serde(rename = "owner[password_confirmation]")]
    pub owner_password_confirmation: Option<String>,
}

impl SignupForm {
    fn values(&self) -> SignupFormValues {
        SignupFormValues {
            subdomain: self.subdomain.clone(),
            name: self.owner_name.clone().unwrap_or_default(),
            email: self.owner_email.clone().unwrap_or_default(),
        }
    }

    /// A form without any owner field carries no owner at all.
    fn into_request(self) -> SignupRequest {
        let Self {
            subdomain,
            owner_name,
            owner_email,
            owner_password,
            owner_password_confirmation,
        } = self;
        let has_owner = owner_name.is_some()
            || owner_email.is_some()
            || owner_password.is_some()
            || owner_password_confirmation.is_some();
        let owner = has_owner.then(|| OwnerInput {
            name: owner_name.unwrap_or_default(),
            email: owner_email.unwrap_or_default(),
            password: owner_password.unwrap_or_default(),
            password_confirmation: owner_password_confirmation.unwrap_or_default(),
        });
        SignupRequest { subdomain, owner }
    }
}

fn form_page(
    status: StatusCode,
    state: &HttpState,
    flash: &Flash,
    values: &SignupFormValues,
    errors: &ValidationErrors,
) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(new_account_page(
            &flash.take(),
            values,
            errors,
            state.password_policy.min_length(),
        ))
}

/// Render an empty signup form.
#[get("/accounts/new")]
pub async fn new_account(state: web::Data<HttpState>, flash: Flash) -> HttpResponse {
    form_page(
        StatusCode::OK,
        &state,
        &flash,
        &SignupFormValues::default(),
        &ValidationErrors::default(),
    )
}

/// Create an account and its owner.
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    flash: Flash,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let values = form.values();

    match state.signup.sign_up(form.into_request()).await {
        Ok(receipt) => {
            flash.push(FlashKind::Notice, receipt.notice())?;
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .finish())
        }
        Err(SignupError::Rejected(errors)) => Ok(form_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            &state,
            &flash,
            &values,
            &errors,
        )),
        Err(SignupError::Failed(error)) => Err(error),
    }
}
