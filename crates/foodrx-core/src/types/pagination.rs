//! Restartable batch cursors for draining large collections page by page.
//!
//! Two flavours exist:
//!
//! - [`OffsetCursor`] advances a monotonic offset over a stable ordering
//!   (used for the user population, which the pipeline never shrinks).
//! - [`KeysetCursor`] remembers the last key seen (used for the pending
//!   queue, which shrinks as items are marked sent, so offsets would skip).
//!
//! Both treat a short page as the end of the stream, saving the extra
//! round-trip that would otherwise return an empty page.

use serde::{Deserialize, Serialize};

/// One offset/limit page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    pub offset: u64,
    /// Maximum number of rows to return.
    pub limit: u32,
}

/// Offset-based cursor over a stably ordered collection.
#[derive(Debug, Clone)]
pub struct OffsetCursor {
    offset: u64,
    batch_size: u32,
    exhausted: bool,
    pages_fetched: u32,
}

impl OffsetCursor {
    /// Start a cursor at the beginning of the collection.
    pub fn new(batch_size: u32) -> Self {
        Self::resume_at(0, batch_size)
    }

    /// Resume a cursor from a previously reached offset.
    pub fn resume_at(offset: u64, batch_size: u32) -> Self {
        Self {
            offset,
            batch_size: batch_size.max(1),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// The next page to fetch, or `None` once the stream is exhausted.
    pub fn next_page(&self) -> Option<PageRequest> {
        (!self.exhausted).then_some(PageRequest {
            offset: self.offset,
            limit: self.batch_size,
        })
    }

    /// Record that a page with `fetched` rows was received.
    pub fn advance(&mut self, fetched: usize) {
        self.pages_fetched += 1;
        self.offset += fetched as u64;
        if fetched < self.batch_size as usize {
            self.exhausted = true;
        }
    }

    /// Current offset (rows consumed so far, plus the resume point).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of pages fetched through this cursor.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Whether the end of the stream has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// One keyset page request: rows strictly after `after`, in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetPage<K> {
    /// Last key of the previous page, or `None` for the first page.
    pub after: Option<K>,
    /// Maximum number of rows to return.
    pub limit: u32,
}

/// Keyset cursor over a collection that may shrink while it is drained.
#[derive(Debug, Clone)]
pub struct KeysetCursor<K> {
    after: Option<K>,
    batch_size: u32,
    exhausted: bool,
    pages_fetched: u32,
}

impl<K: Clone> KeysetCursor<K> {
    /// Start a cursor at the beginning of the collection.
    pub fn new(batch_size: u32) -> Self {
        Self {
            after: None,
            batch_size: batch_size.max(1),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// The next page to fetch, or `None` once the stream is exhausted.
    pub fn next_page(&self) -> Option<KeysetPage<K>> {
        (!self.exhausted).then(|| KeysetPage {
            after: self.after.clone(),
            limit: self.batch_size,
        })
    }

    /// Record a received page of `fetched` rows whose last key is `last_key`.
    pub fn advance(&mut self, fetched: usize, last_key: Option<K>) {
        self.pages_fetched += 1;
        if let Some(key) = last_key {
            self.after = Some(key);
        }
        if fetched < self.batch_size as usize {
            self.exhausted = true;
        }
    }

    /// Last key consumed so far.
    pub fn position(&self) -> Option<&K> {
        self.after.as_ref()
    }

    /// Number of pages fetched through this cursor.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Whether the end of the stream has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_cursor_short_page_ends_stream() {
        let mut cursor = OffsetCursor::new(1000);
        let mut rounds = Vec::new();
        let mut remaining = 2500usize;

        while let Some(page) = cursor.next_page() {
            let fetched = remaining.min(page.limit as usize);
            rounds.push((page.offset, fetched));
            remaining -= fetched;
            cursor.advance(fetched);
        }

        assert_eq!(rounds, vec![(0, 1000), (1000, 1000), (2000, 500)]);
        assert_eq!(cursor.pages_fetched(), 3);
    }

    #[test]
    fn test_offset_cursor_exact_multiple_needs_empty_page() {
        let mut cursor = OffsetCursor::new(10);
        cursor.advance(10);
        assert!(cursor.next_page().is_some());
        cursor.advance(0);
        assert!(cursor.next_page().is_none());
        assert_eq!(cursor.offset(), 10);
    }

    #[test]
    fn test_offset_cursor_resume() {
        let cursor = OffsetCursor::resume_at(3000, 1000);
        assert_eq!(
            cursor.next_page(),
            Some(PageRequest {
                offset: 3000,
                limit: 1000
            })
        );
    }

    #[test]
    fn test_keyset_cursor_tracks_last_key() {
        let mut cursor: KeysetCursor<u32> = KeysetCursor::new(2);
        assert_eq!(cursor.next_page().unwrap().after, None);
        cursor.advance(2, Some(7));
        assert_eq!(cursor.next_page().unwrap().after, Some(7));
        cursor.advance(1, Some(9));
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.position(), Some(&9));
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let cursor = OffsetCursor::new(0);
        assert_eq!(cursor.next_page().unwrap().limit, 1);
    }
}
