//! Search, filtering, ordering and paging over a post collection.
//!
//! Every function here is total: empty or out-of-range input produces an empty
//! result or the nearest valid page, never a panic.

mod highlight;
mod pagination;
mod search;
mod sort;

pub use highlight::{highlight, Segment};
pub use pagination::{page_number_window, paginate, Page, Pagination, PAGE_WINDOW};
pub use search::{filter_by_category, search, search_score, ALL_CATEGORIES};
pub use sort::{sort_posts, SortMode, UnknownSortMode};

/// How many hits the search dialog previews before linking to the full results.
pub const SEARCH_PREVIEW_LIMIT: usize = 5;
