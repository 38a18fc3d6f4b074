//! Practice problem catalog and the pager over it.

use std::path::Path;

use coderoom_common::CoderoomError;
use serde::Deserialize;
use tracing::info;

const BUILTIN_PROBLEMS: &str = include_str!("problems.toml");

/// One practice problem. Input and expected output are arbitrary JSON values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Problem {
    pub title: String,
    pub description: String,
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
}

impl Problem {
    /// Input example rendered as compact JSON.
    pub fn input_text(&self) -> String {
        self.input.to_string()
    }

    /// Expected output rendered as compact JSON.
    pub fn expected_output_text(&self) -> String {
        self.expected_output.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    problems: Vec<Problem>,
}

/// Ordered, immutable, never-empty list of problems.
#[derive(Debug, Clone)]
pub struct ProblemCatalog {
    problems: Vec<Problem>,
}

impl ProblemCatalog {
    pub fn builtin() -> Result<Self, CoderoomError> {
        Self::from_toml(BUILTIN_PROBLEMS)
    }

    pub fn from_toml(content: &str) -> Result<Self, CoderoomError> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| CoderoomError::Catalog(format!("failed to parse catalog: {e}")))?;
        Self::new(file.problems)
    }

    pub fn load(path: &Path) -> Result<Self, CoderoomError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoderoomError::Catalog(format!("failed to read {}: {e}", path.display()))
        })?;
        let catalog = Self::from_toml(&content)?;
        info!(path = %path.display(), problems = catalog.len(), "loaded problem catalog");
        Ok(catalog)
    }

    pub fn new(problems: Vec<Problem>) -> Result<Self, CoderoomError> {
        if problems.is_empty() {
            return Err(CoderoomError::Catalog("catalog has no problems".into()));
        }
        Ok(Self { problems })
    }

    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }
}

/// Position in a catalog. Moves are clamped to the ends; there is no
/// wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProblemCursor {
    index: usize,
    len: usize,
}

impl ProblemCursor {
    pub fn new(catalog: &ProblemCatalog) -> Self {
        Self {
            index: 0,
            len: catalog.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Step back one problem. Returns `false` at the first problem.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one problem. Returns `false` at the last problem.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn current<'a>(&self, catalog: &'a ProblemCatalog) -> &'a Problem {
        // The cursor was built from a non-empty catalog; clamp in case a
        // shorter one is passed.
        let last = catalog.len() - 1;
        &catalog.problems[self.index.min(last)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = ProblemCatalog::builtin().unwrap();
        assert!(catalog.len() >= 2);
        let first = catalog.get(0).unwrap();
        assert_eq!(first.title, "Two Sum");
        assert_eq!(first.expected_output_text(), "[0,1]");
        assert_eq!(first.input_text(), r#"{"nums":[2,7,11,15],"target":9}"#);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(ProblemCatalog::new(Vec::new()).is_err());
        assert!(ProblemCatalog::from_toml("problems = []").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.toml");
        std::fs::write(
            &path,
            r#"
[[problems]]
title = "Echo"
description = "Print the input."
input = "hi"
expected_output = "hi"
"#,
        )
        .unwrap();

        let catalog = ProblemCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().input_text(), "\"hi\"");
    }

    #[test]
    fn previous_at_start_is_noop() {
        let catalog = ProblemCatalog::builtin().unwrap();
        let mut cursor = ProblemCursor::new(&catalog);
        assert!(!cursor.has_previous());
        assert!(!cursor.previous());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn next_at_end_is_noop() {
        let catalog = ProblemCatalog::builtin().unwrap();
        let mut cursor = ProblemCursor::new(&catalog);
        while cursor.next() {}
        assert_eq!(cursor.index(), catalog.len() - 1);
        assert!(!cursor.has_next());
        assert!(!cursor.next());
        assert_eq!(cursor.index(), catalog.len() - 1);
    }

    #[test]
    fn moves_are_single_steps() {
        let catalog = ProblemCatalog::builtin().unwrap();
        let mut cursor = ProblemCursor::new(&catalog);
        assert!(cursor.next());
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.current(&catalog).title, catalog.get(1).unwrap().title);
        assert!(cursor.previous());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn single_problem_catalog_cannot_move() {
        let catalog = ProblemCatalog::from_toml(
            "[[problems]]\ntitle = \"A\"\ndescription = \"\"\ninput = 1\nexpected_output = 1\n",
        )
        .unwrap();
        let mut cursor = ProblemCursor::new(&catalog);
        assert!(!cursor.next());
        assert!(!cursor.previous());
    }
}
