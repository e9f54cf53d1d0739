//! Self-citations: posts linking back to the account, and tallies of which posts they cite.

use crate::post::Post;
use ahash::AHashMap;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Posts with at least one expanded URL containing `handle`, in input order.
/// A post is included once no matter how many of its links match.
pub fn find_self_citations<'a>(posts: &'a [Post], handle: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.expanded_urls().any(|u| u.contains(handle)))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCount {
    pub tweet_id: String,
    pub count: u64,
}

/// Citation frequency table, most cited first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationTable {
    pub tweet_counts: Vec<CitationCount>,
}

impl CitationTable {
    /// Sum of all tallies (one per matched link).
    pub fn total_citations(&self) -> u64 {
        self.tweet_counts.iter().map(|c| c.count).sum()
    }

    pub fn len(&self) -> usize {
        self.tweet_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweet_counts.is_empty()
    }
}

/// Recovers cited post IDs from `/<handle>/status/<digits>` links.
#[derive(Clone, Debug)]
pub struct CitationResolver {
    handle: String,
    status_re: Regex,
}

impl CitationResolver {
    pub fn new(handle: impl Into<String>) -> Result<Self> {
        let handle = handle.into();
        let pattern = format!(r"/{}/status/(\d+)", regex::escape(&handle));
        let status_re = Regex::new(&pattern).with_context(|| format!("compile status pattern for @{handle}"))?;
        Ok(Self { handle, status_re })
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Cited post ID in `expanded_url`, if the link is a status link of the handle.
    pub fn cited_id<'u>(&self, expanded_url: &'u str) -> Option<&'u str> {
        if !expanded_url.contains(self.handle.as_str()) {
            return None;
        }
        self.status_re.captures(expanded_url).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    /// Tally cited IDs across `posts`. Every matching link counts, so a post citing the
    /// same status twice adds 2. Output is sorted by count descending; equal counts keep
    /// the order in which the ID was first seen (stable sort, no secondary key).
    pub fn count<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> CitationTable {
        let mut tweet_counts: Vec<CitationCount> = Vec::new();
        let mut slot: AHashMap<String, usize> = AHashMap::new();

        for post in posts {
            for url in post.expanded_urls() {
                let Some(id) = self.cited_id(url) else { continue };
                match slot.get(id) {
                    Some(&i) => tweet_counts[i].count += 1,
                    None => {
                        slot.insert(id.to_string(), tweet_counts.len());
                        tweet_counts.push(CitationCount { tweet_id: id.to_string(), count: 1 });
                    }
                }
            }
        }

        tweet_counts.sort_by(|a, b| b.count.cmp(&a.count));
        CitationTable { tweet_counts }
    }
}
