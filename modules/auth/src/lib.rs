//! Session handling for the inventory client.
//!
//! [`AuthStore`] is a small state machine over three states: *unchecked*
//! (startup), *anonymous* and *authenticated*. It owns the Basic credential
//! lifecycle: login validates a username/password pair against the backend's
//! identity endpoint, restoration replays a persisted token, and a 401 from
//! any request tears the session down through the shared event hub.

mod model;
mod store;
mod token_store;

pub use model::{LoginCredentials, Role, User};
pub use store::{AuthStore, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, SESSION_FILE_NAME};
