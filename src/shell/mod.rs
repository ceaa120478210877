//! Line-oriented front end over the document registry.
//!
//! - [`Command`]: one parsed input line.
//! - [`Session`]: dispatches commands, keeps the command history and prints
//!   periodic snapshot reminders.
//! - [`tree_render`]: box-drawing view of a version tree.

mod command;
mod session;
pub mod tree_render;

pub use command::{Command, ParseError, COMMANDS};
pub use session::{Reply, Session, SNAPSHOT_REMINDER};
