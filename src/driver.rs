//! Executing action lists against a language service.

use crate::action::{Action, ActionKind};
use crate::generate::RewriteMode;
use crate::source_state::{SourceState, SourceStateError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// The service under test. Receives every action together with the shadow
/// buffer as it is right before the action runs.
pub trait LanguageService {
    fn handle(&mut self, action: &Action, state: &SourceState) -> Result<(), ServiceError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{kind} request rejected: {reason}")]
    Rejected { kind: ActionKind, reason: String },

    #[error("language service crashed: {message}")]
    Crashed { message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("action #{index} ({action}) does not fit the buffer: {source}")]
    InvalidOffset {
        index: usize,
        action: String,
        #[source]
        source: SourceStateError,
    },

    #[error("action #{index} ({action}) failed: {source}")]
    Service {
        index: usize,
        action: String,
        #[source]
        source: ServiceError,
    },
}

/// Accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullService;

impl LanguageService for NullService {
    fn handle(&mut self, _action: &Action, _state: &SourceState) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub mode: RewriteMode,
    pub counts: BTreeMap<ActionKind, usize>,
    pub content: String,
    pub was_modified: bool,
}

impl SessionReport {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Feeds actions to a service one at a time while keeping the shadow
/// buffer in step with the edits.
#[derive(Debug)]
pub struct Session {
    state: SourceState,
    counts: BTreeMap<ActionKind, usize>,
    executed: usize,
}

impl Session {
    pub fn new(state: SourceState) -> Self {
        Self {
            state,
            counts: BTreeMap::new(),
            executed: 0,
        }
    }

    /// Run `actions` from `state` to completion.
    pub fn run(
        state: SourceState,
        actions: &[Action],
        service: &mut impl LanguageService,
    ) -> Result<SessionReport, SessionError> {
        let mut session = Self::new(state);
        for action in actions {
            session.execute(action, service)?;
        }
        Ok(session.into_report())
    }

    pub fn state(&self) -> &SourceState {
        &self.state
    }

    /// Validate `action` against the buffer, hand it to the service, then
    /// apply it if it is an edit.
    pub fn execute(
        &mut self,
        action: &Action,
        service: &mut impl LanguageService,
    ) -> Result<(), SessionError> {
        let index = self.executed;
        let invalid = |source| SessionError::InvalidOffset {
            index,
            action: action.to_string(),
            source,
        };

        self.state.check(action).map_err(invalid)?;
        trace!(index, %action, "executing");
        service
            .handle(action, &self.state)
            .map_err(|source| SessionError::Service {
                index,
                action: action.to_string(),
                source,
            })?;
        if action.is_edit() {
            self.state.apply(action).map_err(invalid)?;
        }

        *self.counts.entry(action.kind()).or_default() += 1;
        self.executed += 1;
        Ok(())
    }

    pub fn into_report(self) -> SessionReport {
        debug!(
            mode = self.state.mode().name(),
            actions = self.executed,
            len = self.state.len(),
            "session finished"
        );
        SessionReport {
            mode: self.state.mode(),
            counts: self.counts,
            was_modified: self.state.was_modified(),
            content: self.state.into_content(),
        }
    }
}
