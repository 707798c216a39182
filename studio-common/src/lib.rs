//! Studio Common Types
//!
//! Shared types used by both the user directory and the admin API server.

pub mod calendar;
pub mod role;
pub mod user;

pub use calendar::{CalendarEvent, EventKind, NewEvent, Priority};
pub use role::{Role, UserStatus};
pub use user::{initials, NewUser, UserPatch, UserRecord};
