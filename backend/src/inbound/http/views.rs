//! Server-rendered HTML pages.
//!
//! Pages are plain strings built around one Bootstrap-style layout: a navbar
//! with the "Time Tracker" brand, then flash messages, then the page body.
//! Every interpolated value goes through [`escape`].

use crate::domain::ValidationErrors;
use crate::domain::signup::Field;

use super::flash::FlashMessage;

/// Application name shown in the navbar and titles.
pub const BRAND: &str = "Time Tracker";

/// Escape text for use in HTML element content and quoted attributes.
///
/// # Examples
/// ```
/// use timetracker::inbound::http::views::escape;
///
/// assert_eq!(escape("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap `body` in the shared layout.
#[must_use]
pub fn layout(title: &str, flashes: &[FlashMessage], body: &str) -> String {
    let mut flash_html = String::new();
    for flash in flashes {
        flash_html.push_str(&format!(
            "<div id=\"flash_{kind}\" class=\"alert {class}\">{message}</div>",
            kind = flash.kind().as_str(),
            class = flash.kind().css_class(),
            message = escape(flash.message()),
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>{title} | {BRAND}</title>\n\
</head>\n\
<body>\n\
<header class=\"container\">\n\
<nav class=\"navbar navbar-default\">\n\
<div class=\"navbar-header\"><a class=\"navbar-brand\" href=\"/\">{BRAND}</a></div>\n\
</nav>\n\
</header>\n\
<div class=\"container\">\n\
{flash_html}\n\
<div class=\"row\">\n\
{body}\n\
</div>\n\
</div>\n\
</body>\n\
</html>\n",
        title = escape(title),
    )
}

/// Landing page with the call to action.
#[must_use]
pub fn welcome_page(flashes: &[FlashMessage]) -> String {
    let body = format!(
        "<div class=\"col-md-12\">\n\
<div class=\"jumbotron\">\n\
<h1>{BRAND}</h1>\n\
<p>Track your time with the most awesome time tracking app ever.</p>\n\
<p><a class=\"btn btn-primary btn-lg\" href=\"/accounts/new\">Create Account</a></p>\n\
</div>\n\
</div>"
    );
    layout("Welcome", flashes, &body)
}

/// Values echoed back into the signup form. Passwords are never echoed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupFormValues {
    pub subdomain: String,
    pub name: String,
    pub email: String,
}

fn label_for(field: Field) -> &'static str {
    match field {
        Field::Subdomain => "Subdomain",
        Field::Owner => "Owner",
        Field::OwnerName => "Name",
        Field::OwnerEmail => "Email",
        Field::OwnerPassword => "Password",
        Field::OwnerPasswordConfirmation => "Password confirmation",
    }
}

fn error_summary(errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    let mut html = format!(
        "<div id=\"error_explanation\" class=\"alert alert-danger\">\n\
<h4>{count} {noun} prohibited this account from being saved:</h4>\n<ul>\n",
        count = errors.len(),
    );
    for error in errors.iter() {
        html.push_str(&format!(
            "<li>{} {}</li>\n",
            label_for(error.field()),
            escape(error.message())
        ));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

struct Input<'a> {
    field: Field,
    id: &'a str,
    name: &'a str,
    kind: &'a str,
    value: &'a str,
    hint: Option<String>,
}

fn input_group(input: &Input<'_>, errors: &ValidationErrors) -> String {
    let has_error = errors.has(input.field);
    let mut html = format!(
        "<div class=\"form-group{state}\">\n\
<label for=\"{id}\">{label}</label>\n\
<input class=\"form-control\" type=\"{kind}\" id=\"{id}\" name=\"{name}\" value=\"{value}\">\n",
        state = if has_error { " has-error" } else { "" },
        id = input.id,
        label = label_for(input.field),
        kind = input.kind,
        name = input.name,
        value = escape(input.value),
    );
    if let Some(hint) = &input.hint {
        html.push_str(&format!("<span class=\"help-block\">{}</span>\n", escape(hint)));
    }
    for message in errors.messages_for(input.field) {
        html.push_str(&format!(
            "<span class=\"help-block error\" data-field=\"{}\">{}</span>\n",
            input.field.as_str(),
            escape(message)
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Signup form, optionally carrying the errors of a rejected submission.
#[must_use]
pub fn new_account_page(
    flashes: &[FlashMessage],
    values: &SignupFormValues,
    errors: &ValidationErrors,
    password_min_length: usize,
) -> String {
    let inputs = [
        Input {
            field: Field::Subdomain,
            id: "account_subdomain",
            name: "subdomain",
            kind: "text",
            value: &values.subdomain,
            hint: None,
        },
        Input {
            field: Field::OwnerName,
            id: "account_owner_name",
            name: "owner[name]",
            kind: "text",
            value: &values.name,
            hint: None,
        },
        Input {
            field: Field::OwnerEmail,
            id: "account_owner_email",
            name: "owner[email]",
            kind: "email",
            value: &values.email,
            hint: None,
        },
        Input {
            field: Field::OwnerPassword,
            id: "account_owner_password",
            name: "owner[password]",
            kind: "password",
            value: "",
            hint: Some(format!("{password_min_length} characters minimum")),
        },
        Input {
            field: Field::OwnerPasswordConfirmation,
            id: "account_owner_password_confirmation",
            name: "owner[password_confirmation]",
            kind: "password",
            value: "",
            hint: None,
        },
    ];

    let mut body = String::from("<div class=\"col-md-6\">\n<h2>Create an Account</h2>\n");
    body.push_str(&error_summary(errors));
    body.push_str("<form action=\"/accounts\" method=\"post\" accept-charset=\"UTF-8\">\n");
    if errors.has(Field::Owner) {
        for message in errors.messages_for(Field::Owner) {
            body.push_str(&format!(
                "<span class=\"help-block error\" data-field=\"owner\">Owner {}</span>\n",
                escape(message)
            ));
        }
    }
    for input in &inputs {
        body.push_str(&input_group(input, errors));
    }
    body.push_str(
        "<input class=\"btn btn-primary\" type=\"submit\" value=\"Create Account\">\n</form>\n</div>",
    );
    layout("Create an Account", flashes, &body)
}

/// Minimal page for non-validation failures.
#[must_use]
pub fn error_page(status: u16, message: &str, trace_id: Option<&str>) -> String {
    let reference = trace_id
        .map(|id| format!("<p class=\"text-muted\">Reference: <code>{}</code></p>\n", escape(id)))
        .unwrap_or_default();
    let body = format!(
        "<div class=\"col-md-12\">\n<h2>{status}</h2>\n<p>{message}</p>\n{reference}</div>",
        message = escape(message),
    );
    layout("Error", &[], &body)
}
