//! Probe and edit operations issued against a language service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One unit of work for the session driver.
///
/// Offsets and lengths are in bytes and are only meaningful against the
/// shadow buffer as it exists right before the action executes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    CursorInfo { offset: usize },
    CodeComplete { offset: usize },
    RangeInfo { offset: usize, length: usize },
    TypeContextInfo { offset: usize },
    ConformingMethodList { offset: usize },
    CollectExpressionType,
    ReplaceText {
        offset: usize,
        length: usize,
        text: String,
    },
}

/// Discriminant of an [`Action`].
///
/// The derived ordering is the canonical batching priority used when probe
/// lists are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    CollectExpressionType,
    CursorInfo,
    RangeInfo,
    CodeComplete,
    TypeContextInfo,
    ConformingMethodList,
    ReplaceText,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::CollectExpressionType,
        ActionKind::CursorInfo,
        ActionKind::RangeInfo,
        ActionKind::CodeComplete,
        ActionKind::TypeContextInfo,
        ActionKind::ConformingMethodList,
        ActionKind::ReplaceText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::CollectExpressionType => "collect-expression-type",
            ActionKind::CursorInfo => "cursor-info",
            ActionKind::RangeInfo => "range-info",
            ActionKind::CodeComplete => "code-complete",
            ActionKind::TypeContextInfo => "type-context-info",
            ActionKind::ConformingMethodList => "conforming-method-list",
            ActionKind::ReplaceText => "replace-text",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown request kind '{s}'"))
    }
}

/// Location-based probes attached to token boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    CursorInfo,
    CodeComplete,
    TypeContextInfo,
    ConformingMethodList,
}

impl Probe {
    pub fn at(self, offset: usize) -> Action {
        match self {
            Probe::CursorInfo => Action::CursorInfo { offset },
            Probe::CodeComplete => Action::CodeComplete { offset },
            Probe::TypeContextInfo => Action::TypeContextInfo { offset },
            Probe::ConformingMethodList => Action::ConformingMethodList { offset },
        }
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CursorInfo { .. } => ActionKind::CursorInfo,
            Action::CodeComplete { .. } => ActionKind::CodeComplete,
            Action::RangeInfo { .. } => ActionKind::RangeInfo,
            Action::TypeContextInfo { .. } => ActionKind::TypeContextInfo,
            Action::ConformingMethodList { .. } => ActionKind::ConformingMethodList,
            Action::CollectExpressionType => ActionKind::CollectExpressionType,
            Action::ReplaceText { .. } => ActionKind::ReplaceText,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Action::ReplaceText { .. })
    }

    /// Start of the byte span this action touches, if it has a location.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Action::CursorInfo { offset }
            | Action::CodeComplete { offset }
            | Action::RangeInfo { offset, .. }
            | Action::TypeContextInfo { offset }
            | Action::ConformingMethodList { offset }
            | Action::ReplaceText { offset, .. } => Some(offset),
            Action::CollectExpressionType => None,
        }
    }

    /// End of the byte span this action touches, if it has a location.
    pub fn end(&self) -> Option<usize> {
        match *self {
            Action::RangeInfo { offset, length } | Action::ReplaceText { offset, length, .. } => {
                Some(offset + length)
            }
            _ => self.offset(),
        }
    }

    pub(crate) fn insert(offset: usize, text: &str) -> Action {
        Action::ReplaceText {
            offset,
            length: 0,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::RangeInfo { offset, length } => {
                write!(f, "{} {offset}+{length}", self.kind())
            }
            Action::ReplaceText {
                offset,
                length,
                text,
            } => write!(f, "{} {offset}+{length} {text:?}", self.kind()),
            Action::CollectExpressionType => write!(f, "{}", self.kind()),
            other => match other.offset() {
                Some(offset) => write!(f, "{} {offset}", other.kind()),
                None => write!(f, "{}", other.kind()),
            },
        }
    }
}
