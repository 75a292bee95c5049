//! Fixed-size paging over a list, newest first.

use std::ops::Range;

use serde::Serialize;

/// A window of `size` rows starting at `offset`.
///
/// Offset 0 is the newest page. Paging is clamped to the list, so the
/// window never starts before the first row or past the last full page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryWindow {
    offset: usize,
    size: usize,
}

impl HistoryWindow {
    pub fn new(size: usize) -> Self {
        Self { offset: 0, size }
    }

    pub fn at(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Index range of the rows visible in a list of `len` rows.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = start.saturating_add(self.size).min(len);
        start..end
    }

    /// The rows visible in this window.
    pub fn rows<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn can_page_newer(&self) -> bool {
        self.offset > 0
    }

    pub fn can_page_older(&self, len: usize) -> bool {
        len > self.size && self.offset < len - self.size
    }

    /// Move one page older (`older == true`) or newer, clamped to
    /// `[0, len - size]`.
    pub fn page(&self, older: bool, len: usize) -> Self {
        let last = len.saturating_sub(self.size);
        let offset = if older {
            self.offset.saturating_add(self.size)
        } else {
            self.offset.saturating_sub(self.size)
        };
        Self {
            offset: offset.min(last),
            size: self.size,
        }
    }
}
