pub mod content_store;
pub mod session_store;
pub mod users_store;

pub use content_store::{ContentError, ContentStore};
pub use session_store::SessionStore;
pub use users_store::{UsersError, UsersStore};
