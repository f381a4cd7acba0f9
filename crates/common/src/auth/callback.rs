use std::borrow::Cow;

use percent_encoding::percent_decode_str;

pub const OAUTH_TOKEN_FIELD: &str = "oauth_token";
pub const OAUTH_TOKEN_SECRET_FIELD: &str = "oauth_token_secret";
pub const OAUTH_VERIFIER_FIELD: &str = "oauth_verifier";
pub const NOTE_STORE_URL_FIELD: &str = "edam_noteStoreUrl";
pub const WEB_API_URL_PREFIX_FIELD: &str = "edam_webApiUrlPrefix";
pub const USER_ID_FIELD: &str = "edam_userId";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The user id field is present but is not a decimal integer
    #[error("invalid user id in callback response: {0:?}")]
    InvalidUserId(String),
}

/// A URL-encoded OAuth callback response, parsed lazily.
///
/// The payload is a `&`-joined list of `key=value` pairs. Each pair is
///  split on its *first* `=` only, so encoded separators inside a value
///  (`%3D`) survive decoding intact. Pairs without any `=` are skipped.
///
/// When a key appears more than once the first occurrence wins.
///
/// Lookups distinguish an absent field (`None`) from a field that is
///  present with an empty value (`Some("")`).
///
/// # Examples
///
/// ```
/// use common::auth::CallbackResponse;
///
/// let response = CallbackResponse::new("oauth_token=S%3Ds4&oauth_token_secret=");
/// assert_eq!(response.oauth_token().as_deref(), Some("S=s4"));
/// assert_eq!(response.oauth_token_secret().as_deref(), Some(""));
/// assert_eq!(response.note_store_url(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackResponse<'a> {
    raw: &'a str,
}

impl<'a> CallbackResponse<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// All well-formed pairs in payload order, keys and values decoded
    pub fn fields(&self) -> impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)> + 'a {
        self.raw
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (decode(key), decode(value)))
    }

    /// Look up a single field by name, returning its decoded value
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn oauth_token(&self) -> Option<String> {
        self.field(OAUTH_TOKEN_FIELD)
    }

    pub fn oauth_token_secret(&self) -> Option<String> {
        self.field(OAUTH_TOKEN_SECRET_FIELD)
    }

    pub fn oauth_verifier(&self) -> Option<String> {
        self.field(OAUTH_VERIFIER_FIELD)
    }

    /// URL of the note store on the shard holding the user's account
    pub fn note_store_url(&self) -> Option<String> {
        self.field(NOTE_STORE_URL_FIELD)
    }

    /// Prefix for the web API on the user's shard
    pub fn web_api_url_prefix(&self) -> Option<String> {
        self.field(WEB_API_URL_PREFIX_FIELD)
    }

    /// The numeric id of the authorizing user.
    ///
    /// Only plain decimal digits are accepted; a sign, whitespace, an
    ///  empty value or anything out of range for an `i32` is an error.
    pub fn user_id(&self) -> Result<Option<i32>, CallbackError> {
        let Some(value) = self.field(USER_ID_FIELD) else {
            return Ok(None);
        };

        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CallbackError::InvalidUserId(value));
        }

        value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| CallbackError::InvalidUserId(value))
    }
}

impl<'a> From<&'a str> for CallbackResponse<'a> {
    fn from(raw: &'a str) -> Self {
        Self::new(raw)
    }
}

// Invalid UTF-8 after decoding is replaced rather than rejected,
//  a bad byte in one field should not hide the others.
fn decode(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}
