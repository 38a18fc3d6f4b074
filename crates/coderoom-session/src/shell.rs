//! Call shell: the leave control and toolbar visibility.

use tracing::info;

use crate::editor::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarIcon {
    Video,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarMode {
    /// Always visible.
    Pinned,
    /// Shown on hover only.
    AutoHide,
}

/// Per-participant call state.
#[derive(Debug, Clone)]
pub struct CallShell {
    clicked_icon: Option<ToolbarIcon>,
    connected: bool,
}

impl CallShell {
    pub fn new() -> Self {
        Self {
            clicked_icon: None,
            connected: true,
        }
    }

    pub fn click(&mut self, icon: ToolbarIcon) {
        self.clicked_icon = Some(icon);
    }

    pub fn clicked_icon(&self) -> Option<ToolbarIcon> {
        self.clicked_icon
    }

    /// The toolbar stays pinned while the video view is active.
    pub fn toolbar_mode(&self) -> ToolbarMode {
        match self.clicked_icon {
            Some(ToolbarIcon::Video) => ToolbarMode::Pinned,
            _ => ToolbarMode::AutoHide,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Leave the room. Unilateral: no peer is asked.
    pub async fn leave(&mut self, session: &EditorSession) {
        if !self.connected {
            return;
        }
        session.teardown().await;
        self.connected = false;
        info!("Left the room");
    }
}

impl Default for CallShell {
    fn default() -> Self {
        Self::new()
    }
}
