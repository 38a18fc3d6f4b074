//! Immutable reference data injected into sessions at startup: the language
//! table and the practice problem catalog.

mod languages;
mod problems;

pub use languages::{LanguageDescriptor, LanguageKey, LanguageTable};
pub use problems::{Problem, ProblemCatalog, ProblemCursor};
