use crate::id_generator::IdGenerator;
use crate::{Connection, EditorError, EditorResult, State};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default file name used when saving a project
pub const DEFAULT_PROJECT_FILE: &str = "flowchart.json";

/// Plain snapshot of a scene: both collections, no view state.
///
/// Missing collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub states: Vec<State>,

    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl ProjectDocument {
    /// Parse a document, mapping any shape mismatch to `InvalidDocument`
    pub fn from_json(text: &str) -> EditorResult<Self> {
        let document: Self =
            serde_json::from_str(text).map_err(|e| EditorError::InvalidDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    pub fn to_json_pretty(&self) -> EditorResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::InvalidDocument(e.to_string()))
    }

    /// Check what a loaded scene relies on: unique ids per collection,
    /// id suffixes below `u64::MAX` so the counters can move past them,
    /// and positive state sizes. Connection endpoints are not checked.
    pub fn validate(&self) -> EditorResult<()> {
        let mut seen = HashSet::new();
        for state in &self.states {
            check_id_suffix(&state.id)?;
            if !seen.insert(state.id.as_str()) {
                return Err(EditorError::InvalidDocument(format!(
                    "duplicate state id: {}",
                    state.id
                )));
            }
            if !(state.width > 0.0 && state.height > 0.0) {
                return Err(EditorError::InvalidDocument(format!(
                    "state {} has non-positive size {}x{}",
                    state.id, state.width, state.height
                )));
            }
        }

        let mut seen = HashSet::new();
        for connection in &self.connections {
            check_id_suffix(&connection.id)?;
            if !seen.insert(connection.id.as_str()) {
                return Err(EditorError::InvalidDocument(format!(
                    "duplicate connection id: {}",
                    connection.id
                )));
            }
        }

        Ok(())
    }
}

fn check_id_suffix(id: &str) -> EditorResult<()> {
    match IdGenerator::decode(id) {
        Some(u64::MAX) => Err(EditorError::InvalidDocument(format!(
            "id suffix out of range: {id}"
        ))),
        _ => Ok(()),
    }
}

/// A project document on disk
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
}

impl ProjectFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `flowchart.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_PROJECT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a document as pretty-printed JSON
    pub fn save(&self, document: &ProjectDocument) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create project file: {}", self.path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, document)
            .with_context(|| format!("Failed to write project to: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            states = document.states.len(),
            connections = document.connections.len(),
            "project saved"
        );
        Ok(())
    }

    /// Load and shape-check a document
    pub fn load(&self) -> Result<ProjectDocument> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open project file: {}", self.path.display()))?;
        let mut text = String::new();
        BufReader::new(file)
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read project file: {}", self.path.display()))?;

        let document = ProjectDocument::from_json(&text)
            .with_context(|| format!("Failed to parse project from: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            states = document.states.len(),
            connections = document.connections.len(),
            "project loaded"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionStyle, Rectangle};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> ProjectDocument {
        ProjectDocument {
            states: vec![
                State::new(
                    "state-1",
                    "Start",
                    "",
                    Rectangle::new(0.0, 0.0, 120.0, 80.0),
                    "#ffffff",
                ),
                State::new(
                    "state-2",
                    "End",
                    "done",
                    Rectangle::new(200.0, 0.0, 120.0, 80.0),
                    "#ffffff",
                ),
            ],
            connections: vec![Connection::new(
                "connection-1",
                "state-1",
                "state-2",
                "next",
                ConnectionStyle::Curved,
                "#6c757d",
            )],
        }
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let doc = ProjectDocument::from_json("{}").unwrap();
        assert!(doc.states.is_empty());
        assert!(doc.connections.is_empty());

        let doc = ProjectDocument::from_json(r#"{"connections": []}"#).unwrap();
        assert!(doc.states.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        assert_matches!(
            ProjectDocument::from_json("{ invalid json }"),
            Err(EditorError::InvalidDocument(_))
        );
        assert_matches!(
            ProjectDocument::from_json(r#"{"states": 3}"#),
            Err(EditorError::InvalidDocument(_))
        );
        assert_matches!(
            ProjectDocument::from_json(
                r##"{"connections": [{"id": "connection-1", "from": "a", "to": "b",
                    "label": "", "style": "zigzag", "color": "#000"}]}"##
            ),
            Err(EditorError::InvalidDocument(_))
        );
    }

    #[test]
    fn test_exhausted_id_suffix_rejected() {
        let mut doc = sample();
        doc.states[1].id = format!("state-{}", u64::MAX);
        doc.connections[0].to = doc.states[1].id.clone();
        assert_matches!(doc.validate(), Err(EditorError::InvalidDocument(_)));

        let mut doc = sample();
        doc.connections[0].id = format!("connection-{}", u64::MAX);
        assert_matches!(doc.validate(), Err(EditorError::InvalidDocument(_)));

        let mut doc = sample();
        doc.states[1].id = format!("state-{}", u64::MAX - 1);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut doc = sample();
        doc.states[1].id = "state-1".to_string();
        assert_matches!(doc.validate(), Err(EditorError::InvalidDocument(_)));
    }

    #[test]
    fn test_self_loop_is_trusted() {
        let mut doc = sample();
        doc.connections[0].to = "state-1".to_string();
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_project_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let project = ProjectFile::in_dir(temp_dir.path());
        assert!(project.path().ends_with(DEFAULT_PROJECT_FILE));

        let doc = sample();
        project.save(&doc).unwrap();
        let loaded = project.load().unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_corrupted_project_file() {
        let temp_dir = TempDir::new().unwrap();
        let project = ProjectFile::in_dir(temp_dir.path());

        fs::write(project.path(), "{ invalid json }").unwrap();
        assert!(project.load().is_err());

        let missing = ProjectFile::new(temp_dir.path().join("nope.json"));
        assert!(missing.load().is_err());
    }
}
