//! Thread reconstruction over the account's own reply chains.
//!
//! A thread starts at a root (a post that is not a reply but has at least one reply) and
//! follows the earliest reply at every step until a post has no replies. Sibling
//! branches are not materialized. Roots are visited in archive order, which makes the
//! thread map and the "longest thread" tie-break deterministic.

use crate::index::PostIndex;
use crate::post::{Link, Post};
use ahash::{AHashMap, AHashSet};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    pub length: usize,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One post of a thread, in walk order (`order` starts at 1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadTweet {
    pub tweet_id: String,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub order: usize,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub urls: Vec<Link>,
    pub in_reply_to_status_id: Option<String>,
    pub in_reply_to_user_id_str: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub metadata: ThreadMetadata,
    pub tweets: Vec<ThreadTweet>,
}

impl Thread {
    fn from_chain(chain: &[&Post]) -> Self {
        let tweets: Vec<ThreadTweet> = chain
            .iter()
            .enumerate()
            .map(|(i, p)| ThreadTweet {
                tweet_id: p.id.clone().unwrap_or_default(),
                text: p.text.clone(),
                created_at: p.created_at.clone(),
                order: i + 1,
                favorite_count: p.favorite_count,
                retweet_count: p.retweet_count,
                urls: p.urls.clone(),
                in_reply_to_status_id: p.in_reply_to_status_id.clone(),
                in_reply_to_user_id_str: p.in_reply_to_user_id.clone(),
            })
            .collect();

        let metadata = ThreadMetadata {
            length: tweets.len(),
            total_likes: tweets.iter().map(|t| t.favorite_count).sum(),
            total_retweets: tweets.iter().map(|t| t.retweet_count).sum(),
            start_date: tweets.first().and_then(|t| t.created_at.clone()),
            end_date: tweets.last().and_then(|t| t.created_at.clone()),
        };
        Self { metadata, tweets }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.metadata.length
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }
}

/// Threads keyed by root post ID, in root order. Serializes as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadMap {
    threads: Vec<(String, Thread)>,
}

impl ThreadMap {
    pub fn get(&self, root_id: &str) -> Option<&Thread> {
        self.threads.iter().find(|(id, _)| id == root_id).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thread)> {
        self.threads.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn root_ids(&self) -> impl Iterator<Item = &str> {
        self.threads.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

impl Serialize for ThreadMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.threads.len()))?;
        for (id, thread) in &self.threads {
            map.serialize_entry(id, thread)?;
        }
        map.end()
    }
}

/// Build every thread of the archive.
///
/// `posts` is the normalized stream (replies included); `index` supplies the root posts.
/// Posts without an ID never enter the reply graph.
pub fn reconstruct_threads(posts: &[Post], index: &PostIndex<'_>) -> ThreadMap {
    // parent id -> replies, earliest first (stable: equal timestamps keep archive order)
    let mut replies: AHashMap<&str, Vec<&Post>> = AHashMap::new();
    for p in posts {
        if let (Some(_), Some(parent)) = (p.id.as_deref(), p.in_reply_to_status_id.as_deref()) {
            replies.entry(parent).or_default().push(p);
        }
    }
    for children in replies.values_mut() {
        children.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }

    let mut seen = AHashSet::new();
    let roots: Vec<&str> = posts
        .iter()
        .filter(|p| !p.is_reply())
        .filter_map(|p| p.id.as_deref())
        .filter(|id| replies.contains_key(id) && seen.insert(*id))
        .collect();
    tracing::info!("found {} thread roots", roots.len());

    let mut threads = Vec::with_capacity(roots.len());
    for root_id in roots {
        let Some(root) = index.get(root_id) else { continue };
        let chain = walk_chain(root, root_id, &replies);
        // a root always has a reply, so this only guards malformed input
        if chain.len() > 1 {
            threads.push((root_id.to_string(), Thread::from_chain(&chain)));
        }
    }
    ThreadMap { threads }
}

/// Follow the earliest reply from `root` until a post has none.
fn walk_chain<'a>(root: &'a Post, root_id: &'a str, replies: &AHashMap<&'a str, Vec<&'a Post>>) -> Vec<&'a Post> {
    let mut chain = vec![root];
    let mut visited: AHashSet<&str> = AHashSet::new();
    visited.insert(root_id);

    let mut current = root_id;
    while let Some(next) = replies.get(current).and_then(|c| c.first()) {
        let Some(next_id) = next.id.as_deref() else { break };
        if !visited.insert(next_id) {
            tracing::warn!("reply cycle at tweet {} in thread {}; chain truncated", next_id, root_id);
            break;
        }
        chain.push(*next);
        current = next_id;
    }
    chain
}

/// Summary of the longest thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestThread {
    pub length: usize,
    pub thread_id: String,
    pub first_tweet_text: Option<String>,
    pub total_likes: u64,
    pub total_retweets: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreadStatistics {
    pub total_threads: usize,
    pub longest_thread: Option<LongestThread>,
    /// Mean thread length, 2 decimals. Written as the integer `0` when there are no threads.
    #[serde(serialize_with = "average_as_json")]
    pub average_thread_length: f64,
}

impl ThreadStatistics {
    /// Corpus-wide statistics. The longest thread is the first of maximal length in root
    /// order; the average is rounded to 2 decimals (ties to even) and is 0 for an empty map.
    pub fn from_threads(map: &ThreadMap) -> Self {
        let mut longest: Option<(&str, &Thread)> = None;
        for (id, t) in map.iter() {
            if longest.map_or(true, |(_, best)| t.len() > best.len()) {
                longest = Some((id, t));
            }
        }

        let total_threads = map.len();
        let average_thread_length = if total_threads == 0 {
            0.0
        } else {
            let sum: usize = map.iter().map(|(_, t)| t.len()).sum();
            round2(sum as f64 / total_threads as f64)
        };

        Self {
            total_threads,
            longest_thread: longest.map(|(id, t)| LongestThread {
                length: t.len(),
                thread_id: id.to_string(),
                first_tweet_text: t.tweets.first().and_then(|tw| tw.text.clone()),
                total_likes: t.metadata.total_likes,
                total_retweets: t.metadata.total_retweets,
            }),
            average_thread_length,
        }
    }
}

/// Round to 2 decimals on the exact binary value of `x`, ties to even:
/// 2.125 gives 2.12, and 2.675 (stored just below) gives 2.67.
fn round2(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    if x < 0.0 {
        return -round2(-x);
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & ((1u64 << 52) - 1);
    // x == mant * 2^exp
    let (mant, exp) = if biased == 0 { (frac, -1074) } else { (frac | (1u64 << 52), biased - 1075) };
    if exp >= 0 {
        return x;
    }
    let shift = exp.unsigned_abs();
    if shift >= 127 {
        return 0.0;
    }
    let scaled = u128::from(mant) * 100;
    let whole = scaled >> shift;
    let rem = scaled & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    let cents = if rem > half || (rem == half && whole & 1 == 1) { whole + 1 } else { whole };
    cents as f64 / 100.0
}

/// Zero threads serialize as the integer `0`, any real average as a float.
fn average_as_json<S: Serializer>(avg: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *avg == 0.0 {
        serializer.serialize_u64(0)
    } else {
        serializer.serialize_f64(*avg)
    }
}
