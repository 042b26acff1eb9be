//! Entity structs for Stride domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`. The serialized
//! form of [`Task`] is the persisted record shape: dates are RFC 3339 strings and
//! every field round-trips losslessly.

mod history;
mod notification;
mod preferences;
mod task;

pub use history::HistoryEntry;
pub use notification::Notification;
pub use preferences::Preferences;
pub use task::{Task, TaskContext};
