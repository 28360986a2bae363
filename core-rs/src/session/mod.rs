//! Session management
//!
//! - [`SessionStorage`]: durable key/value backend (file or memory)
//! - [`SessionStore`]: the single active session, persisted under
//!   [`SESSION_STORAGE_KEY`] and observable through a watch channel
//!
//! Sessions never expire on their own; only an explicit `clear()` (logout)
//! or wiping the storage ends one.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SessionStore, SESSION_STORAGE_KEY};
