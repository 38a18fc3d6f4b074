//! Configuration schema types for Coderoom.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod channel;
mod editor;
mod execution;
mod system;

pub use channel::*;
pub use editor::*;
pub use execution::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoderoomConfig {
    pub channel: ChannelConfig,
    pub execution: ExecutionConfig,
    pub editor: EditorConfig,
    pub problems: ProblemsConfig,
    pub logging: LoggingConfig,
}
