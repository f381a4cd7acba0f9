mod error;
mod handle;
mod memory;
mod provider;

pub use error::{ErrorCode, ErrorKind, StoreError};
pub use handle::StoreHandle;
pub use memory::{Call, MemoryNoteStore, MemoryNoteStoreError, RecordedCall};
pub use provider::NoteStore;
