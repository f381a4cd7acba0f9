//! OAuth callback handling
//!
//! When the user completes the authorization flow the service redirects
//! back with a URL-encoded response carrying the access token, the URL of
//! the note store on the user's shard and the user's id. [`CallbackResponse`]
//! answers questions about individual fields; [`AuthGrant`] validates the
//! whole response at once and can bind a store handle to the right shard.

mod callback;
mod grant;

pub use callback::{
    CallbackError, CallbackResponse, NOTE_STORE_URL_FIELD, OAUTH_TOKEN_FIELD,
    OAUTH_TOKEN_SECRET_FIELD, OAUTH_VERIFIER_FIELD, USER_ID_FIELD, WEB_API_URL_PREFIX_FIELD,
};
pub use grant::{AuthError, AuthGrant};
