//! IVSS client core.
//!
//! Domain types and the purely local parts of the client: persistence,
//! the session store, the local registration record, the engine lock gate,
//! form validation and the notification feed. Everything that talks to the
//! backend lives in `ivss-client`.

pub mod arco;
pub mod engine;
pub mod errors;
pub mod notifications;
pub mod registration;
pub mod session;
pub mod storage;
pub mod user;
pub mod validation;
pub mod vehicle;

pub use errors::{Error, Result, ValidationError};
pub use session::{ClearScope, SessionField, SessionState, SessionStore};
