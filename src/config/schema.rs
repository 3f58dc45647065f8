use crate::action::ActionKind;
use crate::generate::RewriteMode;
use crate::page::RequestFilter;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct StressConfig {
    #[serde(default)]
    pub generation: Generation,
    #[serde(default)]
    pub requests: Requests,
    #[serde(default)]
    pub files: Files,
}

impl StressConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.generation.modes.is_empty() {
            issues.push(ValidationIssue::EmptyList {
                field: "generation.modes",
            });
        }
        let mut seen = HashSet::new();
        for mode in &self.generation.modes {
            if !seen.insert(mode) {
                issues.push(ValidationIssue::InvalidValue {
                    field: "generation.modes",
                    message: format!("mode '{mode}' listed more than once"),
                });
            }
        }
        if self.generation.page_count == 0 {
            issues.push(ValidationIssue::ZeroPageCount);
        }

        if self.requests.kinds.contains(&ActionKind::ReplaceText) {
            issues.push(ValidationIssue::InvalidValue {
                field: "requests.kinds",
                message: "replace-text is an edit, not a request kind".to_string(),
            });
        }

        if self.files.extensions.is_empty() {
            issues.push(ValidationIssue::EmptyList {
                field: "files.extensions",
            });
        }
        for extension in &self.files.extensions {
            if extension.trim().is_empty() || extension.starts_with('.') {
                issues.push(ValidationIssue::InvalidValue {
                    field: "files.extensions",
                    message: format!("'{extension}' is not a bare file extension"),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Empty `requests.kinds` lets every kind through.
    pub fn request_filter(&self) -> RequestFilter {
        RequestFilter::only(self.requests.kinds.iter().copied())
    }

    pub fn accepts_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.files.extensions.iter().any(|e| e == ext))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Generation {
    #[serde(default = "default_modes")]
    pub modes: Vec<RewriteMode>,
    #[serde(default = "default_page_count")]
    pub page_count: usize,
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            page_count: default_page_count(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Requests {
    #[serde(default)]
    pub kinds: Vec<ActionKind>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Files {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for Files {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_modes() -> Vec<RewriteMode> {
    RewriteMode::ALL.to_vec()
}

fn default_page_count() -> usize {
    1
}

fn default_extensions() -> Vec<String> {
    vec!["rs".to_string()]
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyList {
        field: &'static str,
    },
    ZeroPageCount,
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyList { field } => write!(f, "'{field}' must not be empty"),
            ValidationIssue::ZeroPageCount => {
                write!(f, "'generation.page_count' must be at least 1")
            }
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "invalid '{field}': {message}")
            }
        }
    }
}
