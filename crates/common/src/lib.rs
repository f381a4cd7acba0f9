/**
 * OAuth callback handling.
 *  - Field extraction from the signed callback response
 *  - An eagerly validated grant built on top of it
 */
pub mod auth;
/**
 * Routing of linked notebook operations across
 *  the caller's home shard and the shard that
 *  hosts a notebook shared by another account.
 */
pub mod linked;
/**
 * The remote note store collaborator: the trait every
 *  shard binding implements, its error taxonomy, handles
 *  binding a store to a token, and an in-memory store.
 */
pub mod store;
/**
 * Plain data exchanged with the note store.
 */
pub mod types;

pub mod prelude {
    pub use crate::auth::{AuthError, AuthGrant, CallbackError, CallbackResponse};
    pub use crate::linked::{LinkedStoreError, LinkedStoreRouter};
    pub use crate::store::{
        ErrorCode, ErrorKind, MemoryNoteStore, NoteStore, StoreError, StoreHandle,
    };
    pub use crate::types::{
        AuthenticationResult, LinkedNotebook, Note, Notebook, NotebookRestrictions,
        SharedNotebook, User,
    };
}
