//! Directory history for library browsing.

use thiserror::Error;

/// Where the library view was before descending into a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HistoryFrame {
    /// Location left behind; `None` is the list of media sources.
    pub(crate) location: Option<String>,
    pub(crate) selected: usize,
    pub(crate) scroll: usize,
    /// Display name of the directory that was entered.
    pub(crate) name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("history is empty")]
pub(crate) struct EmptyHistory;

#[derive(Debug, Default)]
pub(crate) struct HistoryStack {
    frames: Vec<HistoryFrame>,
}

impl HistoryStack {
    pub(crate) fn push(&mut self, frame: HistoryFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Result<HistoryFrame, EmptyHistory> {
        self.frames.pop().ok_or(EmptyHistory)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    /// Names of the entered directories, most recent first.
    pub(crate) fn breadcrumb_names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().rev().map(|frame| frame.name.as_str())
    }
}
