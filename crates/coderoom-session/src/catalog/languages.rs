//! Selectable languages and their starter snippets.

use std::fmt;
use std::str::FromStr;

use coderoom_common::CoderoomError;

/// Key of a selectable language, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageKey {
    Cpp,
    #[default]
    Javascript,
    Typescript,
    Python,
    Java,
    Rust,
}

impl LanguageKey {
    pub const ALL: [LanguageKey; 6] = [
        LanguageKey::Cpp,
        LanguageKey::Javascript,
        LanguageKey::Typescript,
        LanguageKey::Python,
        LanguageKey::Java,
        LanguageKey::Rust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageKey::Cpp => "Cpp",
            LanguageKey::Javascript => "Javascript",
            LanguageKey::Typescript => "Typescript",
            LanguageKey::Python => "Python",
            LanguageKey::Java => "Java",
            LanguageKey::Rust => "Rust",
        }
    }

    /// Guess the language of a source file from its extension.
    pub fn from_extension(ext: &str) -> Option<LanguageKey> {
        match ext.to_ascii_lowercase().as_str() {
            "cpp" | "cc" | "cxx" | "hpp" => Some(LanguageKey::Cpp),
            "js" | "mjs" | "cjs" => Some(LanguageKey::Javascript),
            "ts" => Some(LanguageKey::Typescript),
            "py" => Some(LanguageKey::Python),
            "java" => Some(LanguageKey::Java),
            "rs" => Some(LanguageKey::Rust),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageKey {
    type Err = CoderoomError;

    /// Case-insensitive match on the key name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LanguageKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoderoomError::UnknownLanguage(wanted.to_string()))
    }
}

/// Display name, execution-service id and starter source for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub key: LanguageKey,
    pub display_name: &'static str,
    pub execution_id: &'static str,
    pub default_source: &'static str,
}

impl LanguageDescriptor {
    /// Entry filename the execution service expects for this language.
    pub fn entry_filename(&self) -> &'static str {
        coderoom_exec::entry_filename(self.execution_id)
    }
}

/// The fixed key → descriptor mapping.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: Vec<LanguageDescriptor>,
}

impl LanguageTable {
    pub fn builtin() -> Self {
        let entries = LanguageKey::ALL.into_iter().map(builtin_descriptor).collect();
        Self { entries }
    }

    /// Descriptor for `key`. Every key has an entry.
    pub fn get(&self, key: LanguageKey) -> &LanguageDescriptor {
        // `entries` is built from `LanguageKey::ALL`, in order.
        &self.entries[key as usize]
    }

    /// Resolve a user-supplied key name.
    pub fn lookup(&self, name: &str) -> Result<&LanguageDescriptor, CoderoomError> {
        Ok(self.get(name.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageDescriptor> {
        self.entries.iter()
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_descriptor(key: LanguageKey) -> LanguageDescriptor {
    let (display_name, execution_id, default_source) = match key {
        LanguageKey::Cpp => (
            "C++",
            "cpp",
            "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, world!\" << std::endl;\n    return 0;\n}",
        ),
        LanguageKey::Javascript => (
            "javascript",
            "javascript",
            "console.log('Hello, From javascript!');",
        ),
        LanguageKey::Typescript => (
            "typescript",
            "typescript",
            "console.log('Hello, from Typescript');",
        ),
        LanguageKey::Python => ("python", "python", "print('Hello, world from python!')"),
        LanguageKey::Java => (
            "java",
            "java",
            "public class HelloWorld {\n\tpublic static void main(String[] args) {\n\t\tSystem.out.println(\"Hello, world from python!\");\n\t}\n}",
        ),
        LanguageKey::Rust => (
            "rust",
            "rust",
            "fn main() {\n    println!(\"Hello, World from rust!\");\n}",
        ),
    };
    LanguageDescriptor {
        key,
        display_name,
        execution_id,
        default_source,
    }
}
