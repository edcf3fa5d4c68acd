//! Parse diagnostics.
//!
//! Every parser in this crate reports problems through a shared [`Messages`]
//! collection instead of failing: the lexer and parsers recover and keep
//! going, and the host decides what to do with the diagnostics afterwards.
//! The collection is cloneable and internally synchronized; concurrent
//! appends never lose messages (appends are the only mutation).

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::tokenizer::SourceLocation;

/// Severity of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Tolerated deviation; parsing continued normally.
    Warning,
    /// Malformed input; the surrounding construct was dropped or preserved
    /// as an unknown token run.
    Error,
}

/// One diagnostic produced during parsing.
#[derive(Debug, Clone)]
pub struct Message {
    /// Severity.
    pub kind: MessageKind,
    /// Human-readable description.
    pub text: String,
    /// Where in the source the problem was found, when known.
    pub location: Option<SourceLocation>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
        };
        match &self.location {
            Some(loc) => write!(
                f,
                "{}:{}:{}: {kind}: {}",
                loc.filename, loc.line, loc.column, self.text
            ),
            None => write!(f, "{kind}: {}", self.text),
        }
    }
}

struct MessagesInner {
    entries: Mutex<Vec<Message>>,
    strict: bool,
}

/// Append-only diagnostic sink shared by every parser involved in one
/// parse. Clones share the same underlying list.
#[derive(Clone)]
pub struct Messages {
    inner: Arc<MessagesInner>,
}

impl Messages {
    /// A sink in the default (lenient) mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strictness(false)
    }

    /// A sink in strict mode: warnings are recorded as errors.
    #[must_use]
    pub fn strict() -> Self {
        Self::with_strictness(true)
    }

    fn with_strictness(strict: bool) -> Self {
        Self {
            inner: Arc::new(MessagesInner {
                entries: Mutex::new(Vec::new()),
                strict,
            }),
        }
    }

    /// True if this sink escalates warnings.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.inner.strict
    }

    /// Append a warning (escalated to an error in strict mode).
    pub fn warning(&self, text: impl Into<String>, location: Option<SourceLocation>) {
        let kind = if self.inner.strict {
            MessageKind::Error
        } else {
            MessageKind::Warning
        };
        self.push(Message {
            kind,
            text: text.into(),
            location,
        });
    }

    /// Append an error.
    pub fn error(&self, text: impl Into<String>, location: Option<SourceLocation>) {
        self.push(Message {
            kind: MessageKind::Error,
            text: text.into(),
            location,
        });
    }

    fn push(&self, message: Message) {
        let mut entries = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.push(message);
    }

    /// Snapshot of all messages recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Message> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of messages recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any [`MessageKind::Error`] has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .any(|m| m.kind == MessageKind::Error)
    }

    /// For throw-on-error callers: `Err` carrying every recorded error's
    /// text if any error was recorded, `Ok` otherwise.
    pub fn check(&self) -> Result<(), CssError> {
        let entries = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let errors: Vec<String> = entries
            .iter()
            .filter(|m| m.kind == MessageKind::Error)
            .map(ToString::to_string)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CssError::Parse(errors.join("\n")))
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("strict", &self.inner.strict)
            .field("entries", &self.entries())
            .finish()
    }
}

/// Error surfaced to callers that opt into failing on bad input.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    /// One or more parse errors; the payload concatenates their texts.
    #[error("CSS parse failed:\n{0}")]
    Parse(String),
    /// A selector could not be parsed at all.
    #[error("invalid selector '{selector}': {details}")]
    Selector {
        /// The offending selector text.
        selector: String,
        /// Concatenated diagnostic texts.
        details: String,
    },
}
