//! One-shot flash messages kept in the cookie session.
//!
//! A handler pushes a message before redirecting; the next page that renders
//! takes every pending message, which removes them from the session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Error;

pub(crate) const FLASH_KEY: &str = "flash";

/// Flash category, rendered as `id="flash_{kind}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Notice,
    Warning,
    Error,
}

impl FlashKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Bootstrap alert class for the category.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Notice => "alert-success",
            Self::Warning => "alert-warning",
            Self::Error => "alert-danger",
        }
    }
}

/// A single pending message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    kind: FlashKind,
    message: String,
}

impl FlashMessage {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FlashKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Session wrapper exposing flash operations to handlers.
#[derive(Clone)]
pub struct Flash(Session);

impl Flash {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Queue a message for the next rendered page.
    pub fn push(&self, kind: FlashKind, message: impl Into<String>) -> Result<(), Error> {
        let mut pending = self.pending()?;
        pending.push(FlashMessage::new(kind, message));
        self.0
            .insert(FLASH_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to store flash: {error}")))
    }

    /// Remove and return every pending message.
    ///
    /// A cookie holding an unreadable payload yields no messages.
    pub fn take(&self) -> Vec<FlashMessage> {
        match self.0.remove_as::<Vec<FlashMessage>>(FLASH_KEY) {
            Some(Ok(messages)) => messages,
            Some(Err(raw)) => {
                warn!(length = raw.len(), "discarding unreadable flash payload");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn pending(&self) -> Result<Vec<FlashMessage>, Error> {
        self.0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read flash: {error}")))
    }
}

impl FromRequest for Flash {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Flash::new) })
    }
}
