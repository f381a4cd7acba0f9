use std::fmt;

use url::Url;

use super::provider::NoteStore;

/// A note store bound to one shard and one access token
#[derive(Clone)]
pub struct StoreHandle<S> {
    endpoint: Url,
    token: String,
    store: S,
}

impl<S: NoteStore> StoreHandle<S> {
    pub fn new(endpoint: Url, token: impl Into<String>, store: S) -> Self {
        Self {
            endpoint,
            token: token.into(),
            store,
        }
    }

    /// The note store URL of the shard this handle talks to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: fmt::Debug> fmt::Debug for StoreHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("store", &self.store)
            .finish()
    }
}
