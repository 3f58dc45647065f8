use crate::action::Action;
use crate::generate::RewriteMode;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The shadow buffer: what the generator believes the real file contains.
///
/// Mutated only through byte-range replacement, so it can be kept
/// byte-identical with the document the language service sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceState {
    mode: RewriteMode,
    content: String,
    was_modified: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceStateError {
    #[error("invalid byte range: [{byte_start}, {byte_end}) in buffer of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("byte offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },

    #[error("range-info probe at {offset} has zero length")]
    EmptyRange { offset: usize },
}

impl SourceState {
    pub fn new(mode: RewriteMode, content: impl Into<String>) -> Self {
        Self {
            mode,
            content: content.into(),
            was_modified: false,
        }
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn was_modified(&self) -> bool {
        self.was_modified
    }

    /// xxh3 hash of the current buffer.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(self.content.as_bytes())
    }

    /// Replace `length` bytes at `offset` with `text`.
    pub fn replace(
        &mut self,
        offset: usize,
        length: usize,
        text: &str,
    ) -> Result<(), SourceStateError> {
        self.check_span(offset, length)?;

        let mut new_content =
            String::with_capacity(self.content.len() + text.len() - length);
        new_content.push_str(&self.content[..offset]);
        new_content.push_str(text);
        new_content.push_str(&self.content[offset + length..]);
        self.content = new_content;
        self.was_modified |= length > 0 || !text.is_empty();

        Ok(())
    }

    /// Check that `action` is valid against the buffer as it is now.
    pub fn check(&self, action: &Action) -> Result<(), SourceStateError> {
        match *action {
            Action::CollectExpressionType => Ok(()),
            Action::RangeInfo { offset, length } => {
                if length == 0 {
                    return Err(SourceStateError::EmptyRange { offset });
                }
                self.check_span(offset, length)
            }
            Action::ReplaceText { offset, length, .. } => self.check_span(offset, length),
            Action::CursorInfo { offset }
            | Action::CodeComplete { offset }
            | Action::TypeContextInfo { offset }
            | Action::ConformingMethodList { offset } => self.check_span(offset, 0),
        }
    }

    /// Validate `action` and, if it is an edit, apply it.
    pub fn apply(&mut self, action: &Action) -> Result<(), SourceStateError> {
        match action {
            Action::ReplaceText {
                offset,
                length,
                text,
            } => self.replace(*offset, *length, text),
            probe => self.check(probe),
        }
    }

    fn check_span(&self, offset: usize, length: usize) -> Result<(), SourceStateError> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= self.content.len())
            .ok_or(SourceStateError::InvalidByteRange {
                byte_start: offset,
                byte_end: offset.saturating_add(length),
                len: self.content.len(),
            })?;

        for boundary in [offset, end] {
            if !self.content.is_char_boundary(boundary) {
                return Err(SourceStateError::NotCharBoundary { offset: boundary });
            }
        }
        Ok(())
    }
}
