use std::fmt;

use url::Url;

use super::callback::{
    CallbackError, CallbackResponse, NOTE_STORE_URL_FIELD, OAUTH_TOKEN_FIELD, USER_ID_FIELD,
    WEB_API_URL_PREFIX_FIELD,
};
use crate::store::{NoteStore, StoreHandle};

/// Represents a problem turning an OAuth callback into usable credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("callback response is missing required field {0}")]
    MissingField(&'static str),
    #[error("callback field {field} is not a valid url: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Callback(#[from] CallbackError),
}

/// The credentials and endpoints granted by a completed OAuth flow.
///
/// Unlike [`CallbackResponse`], which answers questions about single
///  fields, a grant is only built when every field a client needs
///  to reach the user's shard is present and well formed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    token: String,
    note_store_url: Url,
    web_api_url_prefix: Option<Url>,
    user_id: i32,
}

impl AuthGrant {
    pub fn from_response(raw: &str) -> Result<Self, AuthError> {
        let response = CallbackResponse::new(raw);

        let token = response
            .oauth_token()
            .ok_or(AuthError::MissingField(OAUTH_TOKEN_FIELD))?;
        let note_store_url = response
            .note_store_url()
            .ok_or(AuthError::MissingField(NOTE_STORE_URL_FIELD))
            .and_then(|url| parse_url(NOTE_STORE_URL_FIELD, &url))?;
        let web_api_url_prefix = response
            .web_api_url_prefix()
            .map(|url| parse_url(WEB_API_URL_PREFIX_FIELD, &url))
            .transpose()?;
        let user_id = response
            .user_id()?
            .ok_or(AuthError::MissingField(USER_ID_FIELD))?;

        Ok(Self {
            token,
            note_store_url,
            web_api_url_prefix,
            user_id,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn note_store_url(&self) -> &Url {
        &self.note_store_url
    }

    pub fn web_api_url_prefix(&self) -> Option<&Url> {
        self.web_api_url_prefix.as_ref()
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// Bind `store` to this grant's note store and token
    pub fn bind<S: NoteStore>(&self, store: S) -> StoreHandle<S> {
        StoreHandle::new(self.note_store_url.clone(), self.token.clone(), store)
    }
}

// Tokens are credentials, keep them out of logs
impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"<redacted>")
            .field("note_store_url", &self.note_store_url.as_str())
            .field(
                "web_api_url_prefix",
                &self.web_api_url_prefix.as_ref().map(Url::as_str),
            )
            .field("user_id", &self.user_id)
            .finish()
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, AuthError> {
    Url::parse(value).map_err(|source| AuthError::InvalidUrl { field, source })
}
