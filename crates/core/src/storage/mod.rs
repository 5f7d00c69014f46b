//! Key/value persistence collaborator.
//!
//! Session fields and the local registration record are stored as plain
//! strings under named keys. Implementations must be safe to share between
//! async tasks.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::errors::Result;

/// Key of the cached bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key of the cached display username.
pub const USERNAME_KEY: &str = "usuario";

/// Key of the serialized local registration record.
pub const REGISTRATION_KEY: &str = "registro_usuario";

/// String-keyed persistence store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
