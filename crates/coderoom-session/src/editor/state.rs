use crate::catalog::LanguageKey;

/// Snapshot of an editor session, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub language: LanguageKey,
    pub source: String,
    /// Last execution output, local or relayed from a peer.
    pub output: Option<String>,
    /// The output came from a run that wrote to stderr.
    pub is_error: bool,
    /// A run request is in flight; the run control shows "Running".
    pub running: bool,
}

impl EditorState {
    pub fn new(language: LanguageKey, source: impl Into<String>) -> Self {
        Self {
            language,
            source: source.into(),
            output: None,
            is_error: false,
            running: false,
        }
    }
}
