//! Citation enrichment: join the citation table against the post index.

use crate::citations::{CitationCount, CitationTable};
use crate::index::PostIndex;
use crate::post::{Link, Mention, Post};
use serde::{Deserialize, Serialize};

/// Text of the placeholder record for a cited ID with no post in the index.
pub const NOT_FOUND_TEXT: &str = "Tweet not found";

/// A citation count joined with the cited post's metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCitation {
    pub tweet_id: String,
    pub count: u64,
    pub tweet_text: String,
    pub retweeted: Option<bool>,
    pub user_mentions: Vec<Mention>,
    pub urls: Vec<Link>,
    pub favorite_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub in_reply_to_screen_name: Option<String>,
    pub created_at: Option<String>,
    #[serde(skip)]
    pub found: bool,
}

impl EnrichedCitation {
    fn found(c: &CitationCount, post: &Post) -> Self {
        Self {
            tweet_id: c.tweet_id.clone(),
            count: c.count,
            tweet_text: post.text.clone().unwrap_or_default(),
            retweeted: Some(post.retweeted.unwrap_or(false)),
            user_mentions: post.user_mentions.clone(),
            urls: post.urls.clone(),
            favorite_count: Some(post.favorite_count),
            retweet_count: Some(post.retweet_count),
            in_reply_to_screen_name: post.in_reply_to_screen_name.clone(),
            created_at: post.created_at.clone(),
            found: true,
        }
    }

    /// The not-found sentinel: every optional field null, no mentions or links.
    pub fn not_found(c: &CitationCount) -> Self {
        Self {
            tweet_id: c.tweet_id.clone(),
            count: c.count,
            tweet_text: NOT_FOUND_TEXT.to_string(),
            retweeted: None,
            user_mentions: Vec::new(),
            urls: Vec::new(),
            favorite_count: None,
            retweet_count: None,
            in_reply_to_screen_name: None,
            created_at: None,
            found: false,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        !self.found
    }
}

/// Enriched results plus the not-found partition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enrichment {
    /// One entry per citation count, most cited first.
    pub results: Vec<EnrichedCitation>,
    /// The sentinel entries of `results`, in join order.
    pub not_found: Vec<EnrichedCitation>,
}

/// Look up every cited ID in `index`. Misses are expected (deleted posts, posts outside
/// the archive) and become sentinel records rather than errors.
pub fn enrich(table: &CitationTable, index: &PostIndex<'_>) -> Enrichment {
    let mut results = Vec::with_capacity(table.tweet_counts.len());
    let mut not_found = Vec::new();

    for c in &table.tweet_counts {
        match index.get(&c.tweet_id) {
            Some(post) => results.push(EnrichedCitation::found(c, post)),
            None => {
                tracing::debug!("cited tweet {} not in archive", c.tweet_id);
                let sentinel = EnrichedCitation::not_found(c);
                not_found.push(sentinel.clone());
                results.push(sentinel);
            }
        }
    }

    // Same stable comparator as the citation table; equal counts keep join order.
    results.sort_by(|a, b| b.count.cmp(&a.count));

    tracing::info!("enriched {} citations ({} not found)", results.len(), not_found.len());
    Enrichment { results, not_found }
}
