use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use crate::types::{LinkedNotebook, Note, Notebook, SharedNotebook};

/// The remote procedure interface of a single note store shard.
///
/// Every call carries the access token it should run under; an
///  implementation never picks a token on its own. Whoever holds the
///  store decides which token fits which call.
#[async_trait]
pub trait NoteStore: Send + Sync + std::fmt::Debug + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve the shared notebook the token was issued for
    ///
    /// # Arguments
    /// * `token` - A token obtained by authenticating to a shared notebook
    ///
    /// # Returns
    /// * `Ok(SharedNotebook)` - The current sharing record for the token
    /// * `Err(StoreError::NotFound)` - The token is not bound to any share
    async fn get_shared_notebook_by_auth(
        &self,
        token: &str,
    ) -> Result<SharedNotebook, StoreError<Self::Error>>;

    /// Create a note, returning it as stored (guid and timestamps set)
    async fn create_note(&self, token: &str, note: Note) -> Result<Note, StoreError<Self::Error>>;

    /// Create a notebook, returning it as stored, including any
    ///  sharing records the store attached to it
    async fn create_notebook(
        &self,
        token: &str,
        notebook: Notebook,
    ) -> Result<Notebook, StoreError<Self::Error>>;

    async fn get_notebook(
        &self,
        token: &str,
        guid: Uuid,
    ) -> Result<Notebook, StoreError<Self::Error>>;

    /// List the notebooks shared with the account, in catalog order
    async fn list_linked_notebooks(
        &self,
        token: &str,
    ) -> Result<Vec<LinkedNotebook>, StoreError<Self::Error>>;

    /// Add a shared notebook to the account's catalog,
    ///  returning it with its assigned guid
    async fn create_linked_notebook(
        &self,
        token: &str,
        linked_notebook: LinkedNotebook,
    ) -> Result<LinkedNotebook, StoreError<Self::Error>>;

    /// Permanently remove sharing records by id
    ///
    /// # Returns
    /// * `Ok(i32)` - The number of records removed
    async fn expunge_shared_notebooks(
        &self,
        token: &str,
        ids: &[i64],
    ) -> Result<i32, StoreError<Self::Error>>;

    /// Permanently remove a linked notebook from the account's catalog
    ///
    /// # Returns
    /// * `Ok(i32)` - The number of catalog entries removed
    async fn expunge_linked_notebook(
        &self,
        token: &str,
        guid: Uuid,
    ) -> Result<i32, StoreError<Self::Error>>;
}
