//! Structured diagnostics collected while validating and preparing a series.
//!
//! Operations that silently repair their input (coercing labels, squeezing a
//! single-column table, falling back to a default frequency, correcting a
//! fit window) record a [`Notice`] in a caller-owned [`Diagnostics`] sink
//! and emit the same message through `tracing`.

use std::fmt;

use tracing::{info, warn};

/// Category of a recorded notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Index labels were converted to timestamps.
    IndexCoerced,
    /// Index labels were re-ordered chronologically.
    IndexSorted,
    /// A single-column table was converted into a series.
    TableSqueezed,
    /// No regular spacing was found; the default frequency was used.
    FrequencyFallback,
    /// The fit window was corrected to an odd value of at least 3.
    FitWindowAdjusted,
}

impl NoticeKind {
    fn is_warning(self) -> bool {
        matches!(self, Self::TableSqueezed | Self::FitWindowAdjusted)
    }
}

/// One diagnostic message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
}

impl Notice {
    /// Returns the notice category.
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collection of [`Notice`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    notices: Vec<Notice>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a notice and forwards it to the tracing subscriber.
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        if kind.is_warning() {
            warn!(?kind, "{message}");
        } else {
            info!(?kind, "{message}");
        }
        self.notices.push(Notice { kind, message });
    }

    /// Returns all notices in recording order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns `true` if at least one notice of `kind` was recorded.
    pub fn contains(&self, kind: NoticeKind) -> bool {
        self.notices.iter().any(|n| n.kind == kind)
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Returns the number of recorded notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Moves all notices of `other` to the end of `self`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.notices.extend(other.notices);
    }
}
