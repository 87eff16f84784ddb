//! Pagination over ordered slices.
//!
//! Pages are 1-indexed. An empty input still has exactly one valid page
//! (page 1, empty, no neighbors) so the index of a blog with no posts
//! renders instead of 404ing.

/// A 1-indexed window over an ordered sequence.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub items: &'a [T],
    /// `number - 1`, unless this is the first page
    pub prev: Option<usize>,
    /// `number + 1`, unless this is the last page
    pub next: Option<usize>,
}

/// Number of pages `items` splits into at `size` per page. Always at least 1.
pub fn page_count(len: usize, size: usize) -> usize {
    let size = size.max(1);
    len.div_ceil(size).max(1)
}

/// Split `items` into consecutive pages of `size` (the last page may be
/// shorter). `size` must be at least 1; config validation guarantees it.
pub fn pages<T>(items: &[T], size: usize) -> Vec<Page<'_, T>> {
    let size = size.max(1);
    let count = page_count(items.len(), size);

    (1..=count)
        .map(|number| {
            let start = (number - 1) * size;
            let end = (start + size).min(items.len());
            Page {
                number,
                items: &items[start..end],
                prev: (number > 1).then(|| number - 1),
                next: (number < count).then(|| number + 1),
            }
        })
        .collect()
}

/// Fetch a single page by 1-indexed number. `None` means the page does not
/// exist and the caller should take its not-found path.
pub fn select<T>(items: &[T], size: usize, number: usize) -> Option<Page<'_, T>> {
    if number < 1 || number > page_count(items.len(), size) {
        return None;
    }
    pages(items, size).into_iter().nth(number - 1)
}
