//! The Editor Session: one participant's buffer, language and output.

mod autosave;
mod session;
mod state;

#[cfg(test)]
mod tests;

pub use autosave::spawn_autosave;
pub use session::{EditorSession, RunOutcome};
pub use state::EditorState;
