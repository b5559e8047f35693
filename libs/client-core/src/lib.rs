//! Core HTTP plumbing for the inventory client.
//!
//! Design goals:
//! - One wrapper ([`HttpClient`]) owns base-URL joining, JSON codec, auth
//!   header injection and error normalization; resource modules only shape
//!   URLs on top of it.
//! - Credentials are injected via a shared [`CredentialCell`] rather than a
//!   late-bound global, so the wrapper never knows how the auth layer stores
//!   or derives them.
//! - A 401 from any endpoint is broadcast through [`SessionEvents`]; the
//!   auth layer subscribes and tears the session down in one place.

mod credentials;
mod error;
mod events;
mod http;

pub use credentials::CredentialCell;
pub use error::{ApiError, ClientError};
pub use events::SessionEvents;
pub use http::HttpClient;
