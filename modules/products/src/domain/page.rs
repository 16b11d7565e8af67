/// Largest row offset a store accepts (`OFFSET` is a signed 64-bit value).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Zero-based page request; `size` is always at least 1 and
/// `page * size` never exceeds `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Apply the default size to a missing `size` and clamp to `[1, max_size]`.
    /// A page past the largest addressable offset is pulled back to it.
    pub fn clamped(page: Option<u64>, size: Option<u64>, default_size: u64, max_size: u64) -> Self {
        let max_size = max_size.max(1);
        let size = size.unwrap_or(default_size).clamp(1, max_size);
        Self {
            page: page.unwrap_or(0).min(MAX_OFFSET / size),
            size,
        }
    }
}

/// One page of results ordered by id.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, req: PageRequest) -> Self {
        Self {
            items,
            total,
            page: req.page,
            size: req.size,
        }
    }

    /// Number of pages; an empty result still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.size.max(1)).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        assert_eq!(
            PageRequest::clamped(None, None, 20, 1000),
            PageRequest { page: 0, size: 20 }
        );
        assert_eq!(PageRequest::clamped(Some(2), Some(5000), 20, 1000).size, 1000);
        assert_eq!(PageRequest::clamped(None, Some(0), 20, 1000).size, 1);
        assert_eq!(PageRequest::clamped(Some(3), Some(10), 20, 1000).page, 3);
    }

    #[test]
    fn huge_page_is_bounded_to_a_signed_offset() {
        let req = PageRequest::clamped(Some(u64::MAX), Some(20), 20, 1000);
        assert_eq!(req.size, 20);
        let offset = req.page.checked_mul(req.size).unwrap();
        assert!(offset <= i64::MAX as u64);
        assert!(offset + req.size > i64::MAX as u64);

        let one = PageRequest::clamped(Some(u64::MAX), Some(1), 20, 1000);
        assert_eq!(one.page, i64::MAX as u64);
    }

    #[test]
    fn page_navigation() {
        let req = PageRequest { page: 0, size: 2 };
        let p = Page::new(vec![1, 2], 5, req);
        assert_eq!(p.total_pages(), 3);
        assert!(p.has_next());
        assert!(!p.has_previous());

        let last = Page::new(vec![5], 5, PageRequest { page: 2, size: 2 });
        assert!(!last.has_next());
        assert!(last.has_previous());

        let empty: Page<i32> = Page::new(vec![], 0, req);
        assert_eq!(empty.total_pages(), 1);
        assert!(!empty.has_next());

        let far: Page<i32> = Page::new(vec![], 3, PageRequest { page: u64::MAX, size: 1 });
        assert!(!far.has_next());
        assert!(far.has_previous());
    }
}
