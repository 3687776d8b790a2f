use crate::{ElementId, Scene};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,    // informational
    Warning, // legal but probably a mistake
    Error,   // broken references
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    DanglingConnection,
    SelfLoop,
    DuplicateConnection,
    IsolatedState,
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected: Vec<ElementId>,
    pub issue_type: ValidationIssueType,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    /// Issues of one severity
    pub fn with_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Highest severity per element, for highlighting
    pub fn elements_with_issues(&self) -> HashMap<ElementId, ValidationSeverity> {
        let mut elements = HashMap::new();
        for issue in &self.issues {
            for element in &issue.affected {
                elements
                    .entry(element.clone())
                    .and_modify(|severity: &mut ValidationSeverity| {
                        *severity = (*severity).max(issue.severity)
                    })
                    .or_insert(issue.severity);
            }
        }
        elements
    }
}

/// Structural checks over a scene.
///
/// Creation already forbids self-loops and missing endpoints, so errors and
/// warnings here only come from trusted documents loaded as-is.
pub struct Validator;

impl Validator {
    /// Run all validations on a scene
    pub fn validate(scene: &Scene) -> ValidationResult {
        let mut result = ValidationResult::new();

        for connection in scene.dangling_connections() {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Error,
                message: format!(
                    "Connection {} references a missing state ({} -> {}) and will not be drawn.",
                    connection.id, connection.from, connection.to
                ),
                affected: vec![ElementId::Connection(connection.id.clone())],
                issue_type: ValidationIssueType::DanglingConnection,
            });
        }

        for connection in scene.connections().iter().filter(|c| c.is_self_loop()) {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Warning,
                message: format!(
                    "Connection {} loops from {} back to itself.",
                    connection.id, connection.from
                ),
                affected: vec![ElementId::Connection(connection.id.clone())],
                issue_type: ValidationIssueType::SelfLoop,
            });
        }

        // Repeated from/to pairs, reported once per pair
        let mut pairs: HashMap<(&str, &str), Vec<ElementId>> = HashMap::new();
        for connection in scene.connections() {
            pairs
                .entry((connection.from.as_str(), connection.to.as_str()))
                .or_default()
                .push(ElementId::Connection(connection.id.clone()));
        }
        let mut duplicates: Vec<_> = pairs.into_iter().filter(|(_, ids)| ids.len() > 1).collect();
        duplicates.sort_by(|a, b| a.0.cmp(&b.0));
        for ((from, to), ids) in duplicates {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: format!("{} connections run from {} to {}.", ids.len(), from, to),
                affected: ids,
                issue_type: ValidationIssueType::DuplicateConnection,
            });
        }

        if scene.state_count() > 1 {
            let connected: HashSet<&str> = scene
                .connections()
                .iter()
                .flat_map(|c| [c.from.as_str(), c.to.as_str()])
                .collect();
            let isolated: Vec<ElementId> = scene
                .states()
                .iter()
                .filter(|s| !connected.contains(s.id.as_str()))
                .map(|s| ElementId::State(s.id.clone()))
                .collect();
            if !isolated.is_empty() {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    message: format!("{} state(s) have no connections.", isolated.len()),
                    affected: isolated,
                    issue_type: ValidationIssueType::IsolatedState,
                });
            }
        }

        result
    }
}
