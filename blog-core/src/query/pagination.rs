use serde::{Deserialize, Serialize};

/// Most page numbers shown by a pagination control.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Cuts one page out of `items`. Pages are 1-indexed and the requested page is
/// clamped into range, so asking past the end returns the last page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        pagination: Pagination {
            current_page,
            page_size,
            total_items,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        },
    }
}

/// Page numbers for a pagination control: at most [`PAGE_WINDOW`] consecutive
/// numbers around `current`, all within `1..=total_pages`.
pub fn page_number_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total_pages);
    let width = PAGE_WINDOW.min(total_pages);
    let start = current
        .saturating_sub(PAGE_WINDOW / 2)
        .clamp(1, total_pages - width + 1);

    (start..start + width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_pages() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 10, 1);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next);
        assert!(!first.pagination.has_prev);

        let last = paginate(&items, 10, 3);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.pagination.has_next);
        assert!(last.pagination.has_prev);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let items: Vec<u32> = (1..=23).collect();

        let beyond = paginate(&items, 10, 99);
        assert_eq!(beyond.pagination.current_page, 3);
        assert_eq!(beyond.items, vec![21, 22, 23]);

        let zero = paginate(&items, 10, 0);
        assert_eq!(zero.pagination.current_page, 1);
        assert_eq!(zero.items.len(), 10);
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let page = paginate::<u32>(&[], 10, 4);

        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.total_items, 0);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let page = paginate(&["a", "b"], 0, 2);

        assert_eq!(page.pagination.page_size, 1);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items, vec!["b"]);
    }

    #[test]
    fn pages_cover_every_item_once() {
        let items: Vec<u32> = (0..47).collect();
        for size in 1..=12 {
            let total_pages = paginate(&items, size, 1).pagination.total_pages;
            let collected: Vec<u32> = (1..=total_pages)
                .flat_map(|page| paginate(&items, size, page).items)
                .collect();
            assert_eq!(collected, items);
        }
    }

    #[test]
    fn window_is_centred_and_clamped() {
        assert_eq!(page_number_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_number_window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_number_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_number_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_number_window(7, 3), vec![1, 2, 3]);
        assert_eq!(page_number_window(1, 1), vec![1]);
        assert!(page_number_window(1, 0).is_empty());
    }
}
