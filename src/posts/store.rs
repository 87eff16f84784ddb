//! The memoized post collection.
//!
//! Posts are loaded from the filesystem once per process. The store wraps
//! the populate-if-empty check in a mutex so concurrent first requests
//! collapse into a single scan; after population every reader gets the same
//! immutable `Arc<PostSet>` snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Post, PostError};

/// An immutable snapshot of all posts, ordered by descending publish date.
#[derive(Debug)]
pub struct PostSet {
    posts: Vec<Arc<Post>>,
    by_slug: HashMap<String, usize>,
}

impl PostSet {
    /// Build a set from freshly loaded posts. Sorting is stable, so posts
    /// with equal dates keep their enumeration order.
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.published.cmp(&a.published));

        let posts: Vec<Arc<Post>> = posts.into_iter().map(Arc::new).collect();
        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(idx, post)| (post.slug.clone(), idx))
            .collect();

        Self { posts, by_slug }
    }

    /// Posts in descending publish-date order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Post>> {
        self.posts.iter()
    }

    /// The ordered posts as a slice, for pagination.
    pub fn as_slice(&self) -> &[Arc<Post>] {
        &self.posts
    }

    /// Exact-slug lookup.
    pub fn get(&self, slug: &str) -> Option<&Arc<Post>> {
        self.by_slug.get(slug).map(|&idx| &self.posts[idx])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Lock-guarded, populate-once cache of the post collection.
pub struct PostStore {
    inner: Mutex<Option<Arc<PostSet>>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Return the memoized snapshot, running `load` first if this is the
    /// first access. The lock is held across `load`, so racing callers block
    /// until the winner finishes and then read the populated cache.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<PostSet>, PostError>
    where
        F: FnOnce() -> Result<Vec<Post>, PostError>,
    {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(set) = guard.as_ref() {
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(PostSet::from_posts(load()?));
        *guard = Some(Arc::clone(&set));
        Ok(set)
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}
