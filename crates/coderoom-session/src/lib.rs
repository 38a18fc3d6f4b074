//! Client side of a collaborative coding room.
//!
//! An [`EditorSession`] owns one participant's buffer, language and last
//! execution output. It broadcasts local edits and execution results through
//! a [`ChannelSink`] (normally a [`ChannelClient`] connected to the room
//! relay) and applies whatever the room delivers, last writer wins.

pub mod catalog;
pub mod channel;
pub mod editor;
pub mod shell;

pub use catalog::{LanguageDescriptor, LanguageKey, LanguageTable, Problem, ProblemCatalog, ProblemCursor};
pub use channel::{ChannelClient, ChannelClientConfig, ChannelEvent, ChannelSink};
pub use editor::{spawn_autosave, EditorSession, EditorState, RunOutcome};
pub use shell::{CallShell, ToolbarIcon, ToolbarMode};
