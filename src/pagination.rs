use serde::Serialize;

pub const ITEMS_PER_PAGE_OPTIONS: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Entry in the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(usize),
    Ellipsis(EllipsisMarker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipsisMarker;

impl Serialize for EllipsisMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("...")
    }
}

pub const ELLIPSIS: PageItem = PageItem::Ellipsis(EllipsisMarker);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub page_start: usize,
    pub page_end: usize,
    pub total_results: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub pages: Vec<PageItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page)
    }

    /// New dataset size. A page past the end falls back to page 1, not to the
    /// last page.
    pub fn update_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        if self.current_page > self.total_pages() {
            self.current_page = 1;
        }
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Returns false and leaves the page untouched when `page` is out of range.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            return true;
        }
        false
    }

    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            return true;
        }
        false
    }

    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1).saturating_mul(self.items_per_page);
        if start >= rows.len() {
            return &[];
        }
        let end = (start + self.items_per_page).min(rows.len());
        &rows[start..end]
    }

    pub fn info(&self) -> PageInfo {
        let total_pages = self.total_pages();
        let page_end = (self.current_page * self.items_per_page).min(self.total_items);
        let page_start = if self.total_items > 0 {
            (self.current_page - 1) * self.items_per_page + 1
        } else {
            0
        };
        PageInfo {
            current_page: self.current_page,
            total_pages,
            items_per_page: self.items_per_page,
            page_start,
            page_end,
            total_results: self.total_items,
            has_previous: self.current_page > 1,
            has_next: self.current_page < total_pages,
            pages: page_numbers(self.current_page, total_pages),
        }
    }
}

/// Page strip with ellipsis compression for more than seven pages.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    if total <= 7 {
        return (1..=total).map(PageItem::Page).collect();
    }

    if current <= 3 || current >= total - 2 {
        vec![
            PageItem::Page(1),
            PageItem::Page(2),
            PageItem::Page(3),
            ELLIPSIS,
            PageItem::Page(total - 2),
            PageItem::Page(total - 1),
            PageItem::Page(total),
        ]
    } else {
        vec![
            PageItem::Page(1),
            ELLIPSIS,
            PageItem::Page(current - 1),
            PageItem::Page(current),
            PageItem::Page(current + 1),
            ELLIPSIS,
            PageItem::Page(total),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(items: &[PageItem]) -> String {
        items
            .iter()
            .map(|item| match item {
                PageItem::Page(n) => n.to_string(),
                PageItem::Ellipsis(_) => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn middle_page_collapses_both_sides() {
        let mut paginator = Paginator::new(10);
        paginator.update_total(95);
        assert!(paginator.go_to(5));
        assert_eq!(pages(&paginator.info().pages), "1 ... 4 5 6 ... 10");
    }

    #[test]
    fn near_edges_show_head_and_tail() {
        assert_eq!(pages(&page_numbers(2, 10)), "1 2 3 ... 8 9 10");
        assert_eq!(pages(&page_numbers(9, 10)), "1 2 3 ... 8 9 10");
    }

    #[test]
    fn short_lists_are_not_elided() {
        assert_eq!(pages(&page_numbers(1, 7)), "1 2 3 4 5 6 7");
        assert_eq!(pages(&page_numbers(1, 3)), "1 2 3");
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn last_page_is_partial() {
        let rows: Vec<u32> = (0..23).collect();
        let mut paginator = Paginator::new(10);
        paginator.update_total(rows.len());
        assert_eq!(paginator.page_slice(&rows), &rows[0..10]);

        assert!(paginator.go_to(3));
        assert_eq!(paginator.page_slice(&rows), &rows[20..23]);
        let info = paginator.info();
        assert_eq!((info.page_start, info.page_end, info.total_results), (21, 23, 23));
        assert!(!info.has_next);
        assert!(info.has_previous);
    }

    #[test]
    fn empty_dataset_reports_zero_start() {
        let mut paginator = Paginator::default();
        paginator.update_total(0);
        let info = paginator.info();
        assert_eq!((info.page_start, info.page_end, info.total_results), (0, 0, 0));
        assert!(paginator.page_slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn changing_page_size_resets_to_first_page() {
        let mut paginator = Paginator::new(10);
        paginator.update_total(95);
        paginator.go_to(7);
        paginator.set_items_per_page(25);
        assert_eq!(paginator.current_page(), 1);
        assert_eq!(paginator.total_pages(), 4);
    }

    #[test]
    fn shrinking_past_current_page_clamps_to_first() {
        let mut paginator = Paginator::new(10);
        paginator.update_total(95);
        paginator.go_to(8);
        paginator.update_total(35);
        assert_eq!(paginator.current_page(), 1);

        paginator.go_to(3);
        paginator.update_total(30);
        assert_eq!(paginator.current_page(), 3);
    }

    #[test]
    fn bounded_moves() {
        let mut paginator = Paginator::new(10);
        paginator.update_total(15);
        assert!(!paginator.previous());
        assert!(paginator.next());
        assert!(!paginator.next());
        assert!(!paginator.go_to(3));
        assert!(!paginator.go_to(0));
        assert_eq!(paginator.current_page(), 2);
    }

    #[test]
    fn ellipsis_serializes_as_marker() {
        let json = serde_json::to_string(&page_numbers(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }
}
