use blog_core::storage::{read_json, write_json};
use blog_core::{
    filter_by_category, get_or_create_user_id, page_number_window, paginate, CommentStore,
    ContentStore, KeyValueStorage, LikeStore, Page, Post, RecentSearches, SortMode,
};
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

pub const PAGE_SIZE: usize = 6;
pub const RELATED_LIMIT: usize = 3;

const SORT_MODE_KEY: &str = "blog-sort-mode";

/// Everything the components read from and write to, built once at start-up.
pub struct Blog {
    pub content: ContentStore,
    pub comments: CommentStore,
    pub likes: LikeStore,
    pub recent: RecentSearches,
    pub user_id: String,
    storage: Arc<dyn KeyValueStorage>,
}

impl Blog {
    pub fn new(content: ContentStore, storage: Arc<dyn KeyValueStorage>) -> Self {
        let user_id = get_or_create_user_id(storage.as_ref());

        Self {
            content,
            comments: CommentStore::new(storage.clone()),
            likes: LikeStore::new(storage.clone()),
            recent: RecentSearches::new(storage.clone()),
            user_id,
            storage,
        }
    }

    /// Last sort mode picked in the post list.
    pub fn sort_mode(&self) -> SortMode {
        read_json(self.storage.as_ref(), SORT_MODE_KEY).unwrap_or_default()
    }

    pub fn save_sort_mode(&self, mode: SortMode) {
        if let Err(e) = write_json(self.storage.as_ref(), SORT_MODE_KEY, &mode) {
            log::warn!("Failed to remember sort mode: {}", e);
        }
    }
}

/// Shared handle passed to components as a prop.
#[derive(Clone)]
pub struct Services(Rc<Blog>);

impl Services {
    pub fn new(blog: Blog) -> Self {
        Self(Rc::new(blog))
    }
}

impl Deref for Services {
    type Target = Blog;

    fn deref(&self) -> &Blog {
        &self.0
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// One page of the post list plus the page numbers to offer around it.
pub fn listing<'a>(
    corpus: &'a [Post],
    category: &str,
    sort: SortMode,
    page: usize,
) -> (Page<&'a Post>, Vec<usize>) {
    let mut posts = filter_by_category(corpus.iter().collect(), Some(category));
    blog_core::sort_posts(&mut posts, sort);

    let page = paginate(&posts, PAGE_SIZE, page);
    let numbers = page_number_window(page.pagination.current_page, page.pagination.total_pages);
    (page, numbers)
}
