//! Splitting action lists into independently executable pages.
//!
//! A page only needs the buffer contents at its first action. That state is
//! rebuilt by replaying the edits of all earlier pages, so the probes of
//! earlier pages never have to run.

use crate::action::{Action, ActionKind};
use crate::generate::RewriteMode;
use crate::source_state::{SourceState, SourceStateError};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page count must be at least 1")]
    ZeroPages,

    #[error("page {number} is out of range for {count} page(s)")]
    OutOfRange { number: usize, count: usize },

    #[error("invalid page '{spec}', expected N/M")]
    InvalidSpec { spec: String },

    #[error("replaying edits before page {page} failed: {source}")]
    Replay {
        page: usize,
        #[source]
        source: SourceStateError,
    },
}

/// One page out of a page count, both 1-based. Parsed from `N/M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    number: usize,
    count: usize,
}

impl PageSpec {
    pub fn new(number: usize, count: usize) -> Result<Self, PageError> {
        if count == 0 {
            return Err(PageError::ZeroPages);
        }
        if number == 0 || number > count {
            return Err(PageError::OutOfRange { number, count });
        }
        Ok(Self { number, count })
    }

    /// The single page holding every action.
    pub fn whole() -> Self {
        Self {
            number: 1,
            count: 1,
        }
    }

    pub fn number(self) -> usize {
        self.number
    }

    pub fn count(self) -> usize {
        self.count
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::whole()
    }
}

impl FromStr for PageSpec {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PageError::InvalidSpec {
            spec: s.to_string(),
        };
        let (number, count) = s.split_once('/').ok_or_else(invalid)?;
        let number = number.trim().parse().map_err(|_| invalid())?;
        let count = count.trim().parse().map_err(|_| invalid())?;
        Self::new(number, count)
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.count)
    }
}

/// A contiguous slice of a generated action list plus the buffer it
/// starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub actions: Vec<Action>,
    pub start: SourceState,
}

impl Page {
    pub fn start_fingerprint(&self) -> u64 {
        self.start.fingerprint()
    }
}

/// Bounds of `count` contiguous pages over `len` actions. The first
/// `len % count` pages hold one extra action.
pub fn page_bounds(len: usize, count: usize) -> Result<Vec<std::ops::Range<usize>>, PageError> {
    if count == 0 {
        return Err(PageError::ZeroPages);
    }
    let (base, extra) = (len / count, len % count);
    let mut start = 0;
    Ok((0..count)
        .map(|index| {
            let end = start + base + usize::from(index < extra);
            let range = start..end;
            start = end;
            range
        })
        .collect())
}

/// Split `actions` into `count` pages, computing every page's start state
/// from `original`, the file as it is before the first action.
pub fn paginate(
    mode: RewriteMode,
    original: &str,
    actions: &[Action],
    count: usize,
) -> Result<Vec<Page>, PageError> {
    let mut state = SourceState::new(mode, original);
    let mut pages = Vec::with_capacity(count);
    for (index, range) in page_bounds(actions.len(), count)?.into_iter().enumerate() {
        let number = index + 1;
        let chunk = &actions[range];
        pages.push(Page {
            number,
            actions: chunk.to_vec(),
            start: state.clone(),
        });
        replay(&mut state, chunk, number + 1)?;
    }
    Ok(pages)
}

/// Build only the page `spec` selects.
pub fn select(
    mode: RewriteMode,
    original: &str,
    actions: &[Action],
    spec: PageSpec,
) -> Result<Page, PageError> {
    let bounds = page_bounds(actions.len(), spec.count())?;
    let range = bounds[spec.number() - 1].clone();
    let mut start = SourceState::new(mode, original);
    replay(&mut start, &actions[..range.start], spec.number())?;
    Ok(Page {
        number: spec.number(),
        actions: actions[range].to_vec(),
        start,
    })
}

/// Apply the edits of `actions` to `state`, skipping every probe.
fn replay(state: &mut SourceState, actions: &[Action], page: usize) -> Result<(), PageError> {
    let mut edits = 0;
    for action in actions.iter().filter(|a| a.is_edit()) {
        state
            .apply(action)
            .map_err(|source| PageError::Replay { page, source })?;
        edits += 1;
    }
    trace!(page, edits, len = state.len(), "replayed edits");
    Ok(())
}

/// Restricts which probe kinds reach the language service.
///
/// Edits always pass; dropping one would desynchronize the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    kinds: Option<BTreeSet<ActionKind>>,
}

impl RequestFilter {
    /// Let every action through.
    pub fn all() -> Self {
        Self { kinds: None }
    }

    /// Let only `kinds` (and edits) through. An empty list means no
    /// restriction.
    pub fn only(kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        let kinds: BTreeSet<ActionKind> = kinds.into_iter().collect();
        Self {
            kinds: (!kinds.is_empty()).then_some(kinds),
        }
    }

    pub fn allows(&self, action: &Action) -> bool {
        action.is_edit()
            || self
                .kinds
                .as_ref()
                .map_or(true, |kinds| kinds.contains(&action.kind()))
    }

    pub fn apply(&self, actions: &mut Vec<Action>) {
        actions.retain(|action| self.allows(action));
    }
}
