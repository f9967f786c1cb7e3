//! Fixed-size pagination over an ordered post list.
//!
//! Two addressing schemes are supported behind one entry point, selected at
//! the call site:
//!
//! * `Index` slices the list in its current order; this is the general path.
//! * `IdRange` reconstructs the legacy URL scheme where "newest" means
//!   largest id: page 1 holds the highest `page_size` ids, page 2 the next
//!   block down, and so on. It assumes the catalog's ids are dense and
//!   contiguous; a gap silently shrinks the affected page. That assumption
//!   lives entirely inside this strategy and must not leak into `Index`.
//!
//! Out-of-range page numbers (zero or beyond the computed total) yield
//! `None`; they are never clamped.

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::domain::posts::Post;

/// Reference page size; configurable, but the default is pinned by tests for
/// parity with the legacy site.
pub const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageScheme {
    #[default]
    Index,
    IdRange,
}

/// One resolved page. `posts` borrows from the catalog snapshot.
#[derive(Debug)]
pub struct PageSlice<'a> {
    pub number: usize,
    pub total_pages: usize,
    pub posts: Vec<&'a Post>,
}

pub fn total_pages(posts: &[Post], scheme: PageScheme, page_size: NonZeroUsize) -> usize {
    let size = page_size.get();
    match scheme {
        PageScheme::Index => posts.len().div_ceil(size),
        PageScheme::IdRange => match id_bounds(posts) {
            Some((min_id, max_id)) => {
                let span = (max_id - min_id + 1) as usize;
                span.div_ceil(size)
            }
            None => 0,
        },
    }
}

/// Resolve page `number` (1-based) under the given scheme, or `None` when the
/// number is outside `[1, total_pages]`.
pub fn paginate<'a>(
    posts: &'a [Post],
    scheme: PageScheme,
    number: usize,
    page_size: NonZeroUsize,
) -> Option<PageSlice<'a>> {
    match scheme {
        PageScheme::Index => index_page(posts, number, page_size),
        PageScheme::IdRange => id_range_page(posts, number, page_size),
    }
}

fn index_page<'a>(
    posts: &'a [Post],
    number: usize,
    page_size: NonZeroUsize,
) -> Option<PageSlice<'a>> {
    let total = total_pages(posts, PageScheme::Index, page_size);
    if number == 0 || number > total {
        return None;
    }

    let size = page_size.get();
    let start = (number - 1) * size;
    let end = (start + size).min(posts.len());

    Some(PageSlice {
        number,
        total_pages: total,
        posts: posts[start..end].iter().collect(),
    })
}

fn id_range_page<'a>(
    posts: &'a [Post],
    number: usize,
    page_size: NonZeroUsize,
) -> Option<PageSlice<'a>> {
    let (min_id, max_id) = id_bounds(posts)?;
    let total = total_pages(posts, PageScheme::IdRange, page_size);
    if number == 0 || number > total {
        return None;
    }

    let size = page_size.get() as u64;
    let high = max_id - (number as u64 - 1) * size;
    let low = (high + 1).saturating_sub(size).max(min_id);

    let mut page: Vec<&Post> = posts
        .iter()
        .filter(|post| {
            let id = post.id as u64;
            id >= low && id <= high
        })
        .collect();
    page.sort_by(|a, b| b.id.cmp(&a.id));

    Some(PageSlice {
        number,
        total_pages: total,
        posts: page,
    })
}

fn id_bounds(posts: &[Post]) -> Option<(u64, u64)> {
    let mut ids = posts.iter().map(|post| post.id as u64);
    let first = ids.next()?;
    let (min_id, max_id) = ids.fold((first, first), |(min, max), id| {
        (min.min(id), max.max(id))
    });
    Some((min_id, max_id))
}
