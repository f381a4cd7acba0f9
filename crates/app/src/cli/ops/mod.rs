pub mod callback;
pub mod init;
pub mod linked;

pub use callback::Callback;
pub use init::Init;
pub use linked::Linked;
