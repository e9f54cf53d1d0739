//! Post index: post ID -> post, built once and read-only afterwards.

use crate::post::Post;
use ahash::AHashMap;

/// Lookup from post ID to the post borrowed from the normalized stream.
///
/// Duplicate IDs resolve last-write-wins: the entry reflects the last occurrence in
/// input order. Posts without an ID are not indexed.
pub struct PostIndex<'a> {
    by_id: AHashMap<&'a str, &'a Post>,
}

impl<'a> PostIndex<'a> {
    pub fn build(posts: &'a [Post]) -> Self {
        let mut by_id = AHashMap::with_capacity(posts.len());
        let mut duplicates = 0usize;
        for post in posts {
            if let Some(id) = post.id.as_deref() {
                if by_id.insert(id, post).is_some() {
                    duplicates += 1;
                }
            }
        }
        if duplicates > 0 {
            tracing::debug!("post index: {} duplicate ids overwritten", duplicates);
        }
        Self { by_id }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&'a Post> {
        self.by_id.get(id).copied()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
