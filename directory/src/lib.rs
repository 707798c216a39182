//! Studio user directory.
//!
//! CRUD over dashboard accounts backed either by a remote record store or by a
//! local SQLite fallback, chosen once from [`DirectoryConfig`]. Also hosts the
//! dashboard's event calendar.

pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod password;
pub mod store;

pub use calendar::{EventCalendar, UPCOMING_LIMIT};
pub use config::{DirectoryConfig, LocalStoreConfig, RemoteStoreConfig, StoreSelection};
pub use directory::{DirectoryStats, UserDirectory};
pub use error::{Error, Result};
pub use password::PasswordHasher;
pub use store::{open_store, LocalStore, RecordPatch, RemoteStore, UserDraft, UserStore};
