#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::{json, Value};
use tetl::{normalize, reconstruct_threads, Post, PostIndex, RawRecord, ThreadMap, ThreadStatistics};

fn posts_from(raw: Vec<Value>) -> Vec<Post> {
    normalize(raw.into_iter().map(RawRecord::from_value))
}

fn build(posts: &[Post]) -> ThreadMap {
    let index = PostIndex::build(posts);
    reconstruct_threads(posts, &index)
}

fn chain_ids(map: &ThreadMap, root: &str) -> Vec<String> {
    map.get(root).unwrap().tweets.iter().map(|t| t.tweet_id.clone()).collect()
}

/// Root A is replied to by B (T1) and C (T2 > T1); D replies to B.
/// The walk takes the earliest reply at each step, so the thread is [A, B, D] and C is dropped,
/// even though C appears before B in the input.
#[test]
fn earliest_reply_wins_at_branch_points() {
    let posts = posts_from(vec![
        wrapped(tweet("A", "root", "2021-01-01T00:00:00Z", None, &[], 1, 0)),
        wrapped(tweet("C", "late", "2021-01-01T00:02:00Z", Some("A"), &[], 0, 0)),
        wrapped(tweet("B", "early", "2021-01-01T00:01:00Z", Some("A"), &[], 0, 0)),
        wrapped(tweet("D", "after B", "2021-01-01T00:03:00Z", Some("B"), &[], 0, 0)),
    ]);
    let map = build(&posts);

    assert_eq!(map.len(), 1);
    assert_eq!(chain_ids(&map, "A"), vec!["A", "B", "D"]);

    let t = map.get("A").unwrap();
    assert_eq!(t.metadata.length, 3);
    let orders: Vec<usize> = t.tweets.iter().map(|tw| tw.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert!(map.get("C").is_none(), "dropped siblings do not become threads");
}

/// Posts that nobody replies to never form threads, and a reply is never a root.
#[test]
fn only_replied_non_replies_are_roots() {
    let posts = posts_from(vec![
        wrapped(tweet("1", "alone", "t1", None, &[], 0, 0)),
        wrapped(tweet("2", "reply to someone else", "t2", Some("elsewhere"), &[], 0, 0)),
        wrapped(tweet("3", "reply to 2", "t3", Some("2"), &[], 0, 0)),
    ]);
    let map = build(&posts);
    assert!(map.is_empty());

    let stats = ThreadStatistics::from_threads(&map);
    assert_eq!(
        serde_json::to_value(&stats).unwrap(),
        json!({ "total_threads": 0, "longest_thread": null, "average_thread_length": 0 })
    );
}

/// Per-thread totals add string-encoded counters (missing counts as 0) and take the
/// start/end dates from the first and last tweet of the walk.
#[test]
fn thread_metadata_aggregates_engagement() {
    let posts = posts_from(vec![
        wrapped(tweet("10", "a", "2021-05-01T00:00:00Z", None, &[], 5, 1)),
        wrapped(tweet("11", "b", "2021-05-01T00:01:00Z", Some("10"), &[], 3, 2)),
        wrapped(json!({
            "id_str": "12",
            "full_text": "c",
            "created_at": "2021-05-01T00:02:00Z",
            "in_reply_to_status_id_str": "11",
        })),
    ]);
    let map = build(&posts);
    let meta = &map.get("10").unwrap().metadata;

    assert_eq!(meta.length, 3);
    assert_eq!(meta.total_likes, 8);
    assert_eq!(meta.total_retweets, 3);
    assert_eq!(meta.start_date.as_deref(), Some("2021-05-01T00:00:00Z"));
    assert_eq!(meta.end_date.as_deref(), Some("2021-05-01T00:02:00Z"));
}

/// Statistics: the longest thread is the first of maximal length in archive order,
/// and the average length is rounded to 2 decimals.
#[test]
fn statistics_pick_first_longest_and_round_average() {
    let posts = posts_from(vec![
        wrapped(tweet("r1", "first", "t1", None, &[], 1, 1)),
        wrapped(tweet("r1a", "", "t2", Some("r1"), &[], 0, 0)),
        wrapped(tweet("r2", "second", "t3", None, &[], 2, 0)),
        wrapped(tweet("r2a", "", "t4", Some("r2"), &[], 0, 0)),
        wrapped(tweet("r2b", "", "t5", Some("r2a"), &[], 0, 0)),
        wrapped(tweet("r3", "third", "t6", None, &[], 0, 0)),
        wrapped(tweet("r3a", "", "t7", Some("r3"), &[], 0, 0)),
        wrapped(tweet("r3b", "", "t8", Some("r3a"), &[], 0, 0)),
    ]);
    let map = build(&posts);
    let roots: Vec<&str> = map.root_ids().collect();
    assert_eq!(roots, vec!["r1", "r2", "r3"]);

    let stats = ThreadStatistics::from_threads(&map);
    assert_eq!(stats.total_threads, 3);
    assert_eq!(stats.average_thread_length, 2.67);

    let longest = stats.longest_thread.unwrap();
    assert_eq!(longest.thread_id, "r2");
    assert_eq!(longest.length, 3);
    assert_eq!(longest.first_tweet_text.as_deref(), Some("second"));
    assert_eq!(longest.total_likes, 2);
}

/// `threads` chains of 3 posts followed by `pairs` chains of 2 posts.
fn chains(threads: usize, pairs: usize) -> Vec<Value> {
    let mut raw = Vec::new();
    for i in 0..threads + pairs {
        let root = format!("r{i}");
        raw.push(wrapped(tweet(&root, "start", "t1", None, &[], 0, 0)));
        raw.push(wrapped(tweet(&format!("{root}a"), "", "t2", Some(root.as_str()), &[], 0, 0)));
        if i < threads {
            raw.push(wrapped(tweet(&format!("{root}b"), "", "t3", Some(format!("{root}a").as_str()), &[], 0, 0)));
        }
    }
    raw
}

/// The average rounds like decimal rounding of the stored double:
/// 17/8 = 2.125 is an exact tie and goes to even (2.12);
/// 107/40 is stored just below 2.675 and goes down (2.67);
/// 5/2 = 2.5 stays as is.
#[test]
fn average_rounds_half_to_even() {
    let avg = |threads, pairs| {
        let posts = posts_from(chains(threads, pairs));
        ThreadStatistics::from_threads(&build(&posts))
    };

    let s = avg(1, 7);
    assert_eq!(s.total_threads, 8);
    assert_eq!(s.average_thread_length, 2.12);
    assert_eq!(serde_json::to_value(&s).unwrap()["average_thread_length"], json!(2.12));

    let s = avg(27, 13);
    assert_eq!(s.total_threads, 40);
    assert_eq!(s.average_thread_length, 2.67);

    assert_eq!(avg(1, 1).average_thread_length, 2.5);
}

/// Duplicate ids can close a loop in the reply graph; the walk stops at the first revisit
/// instead of running forever.
#[test]
fn walk_terminates_on_reply_cycles() {
    let posts = posts_from(vec![
        wrapped(tweet("A", "root", "t1", None, &[], 0, 0)),
        wrapped(tweet("B", "reply", "t2", Some("A"), &[], 0, 0)),
        wrapped(tweet("A", "duplicate id replying to B", "t3", Some("B"), &[], 0, 0)),
    ]);
    let map = build(&posts);

    assert_eq!(map.len(), 1);
    assert_eq!(chain_ids(&map, "A"), vec!["A", "B"]);
}

/// Replies without an id cannot extend a chain; they are ignored by the reply graph.
#[test]
fn replies_without_id_are_ignored() {
    let posts = posts_from(vec![
        wrapped(tweet("1", "root", "t1", None, &[], 0, 0)),
        wrapped(json!({ "full_text": "anonymous", "created_at": "t0", "in_reply_to_status_id_str": "1" })),
        wrapped(tweet("2", "reply", "t2", Some("1"), &[], 0, 0)),
    ]);
    let map = build(&posts);
    assert_eq!(chain_ids(&map, "1"), vec!["1", "2"]);
}

/// The thread map serializes as an object keyed by root id with the archive's field names.
#[test]
fn thread_map_serializes_by_root() {
    let posts = posts_from(vec![
        wrapped(tweet("5", "hello", "2021-01-01T00:00:00Z", None, &["https://example.com"], 1, 0)),
        wrapped(tweet("6", "world", "2021-01-01T00:01:00Z", Some("5"), &[], 2, 1)),
    ]);
    let v = serde_json::to_value(build(&posts)).unwrap();

    assert_eq!(v["5"]["metadata"]["length"], json!(2));
    assert_eq!(v["5"]["metadata"]["total_likes"], json!(3));
    assert_eq!(v["5"]["tweets"][0]["urls"][0]["expanded_url"], json!("https://example.com"));
    assert_eq!(v["5"]["tweets"][0]["in_reply_to_status_id"], Value::Null);
    assert_eq!(v["5"]["tweets"][1]["in_reply_to_status_id"], json!("5"));
    assert_eq!(v["5"]["tweets"][1]["in_reply_to_user_id_str"], json!("42"));
    assert_eq!(v["5"]["tweets"][1]["order"], json!(2));
}
