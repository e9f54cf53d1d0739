#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Handle used by every fixture.
pub const HANDLE: &str = "alice";

/// A raw archive tweet object. Counters are strings, as in real archive exports.
pub fn tweet(id: &str, text: &str, created_at: &str, reply_to: Option<&str>, urls: &[&str], likes: u64, retweets: u64) -> Value {
    let urls: Vec<Value> = urls
        .iter()
        .map(|u| {
            json!({
                "url": "https://t.co/x",
                "expanded_url": u,
                "display_url": u.trim_start_matches("https://"),
            })
        })
        .collect();
    let mut v = json!({
        "id_str": id,
        "full_text": text,
        "created_at": created_at,
        "favorite_count": likes.to_string(),
        "retweet_count": retweets.to_string(),
        "retweeted": false,
        "entities": { "urls": urls, "user_mentions": [] },
    });
    if let Some(parent) = reply_to {
        v["in_reply_to_status_id_str"] = json!(parent);
        v["in_reply_to_user_id_str"] = json!("42");
        v["in_reply_to_screen_name"] = json!(HANDLE);
    }
    v
}

/// Wrap a tweet the way archive exports do: `{"tweet": {...}}`.
pub fn wrapped(v: Value) -> Value {
    json!({ "tweet": v })
}

pub fn status_url(handle: &str, id: &str) -> String {
    format!("https://twitter.com/{handle}/status/{id}")
}

/// Write NDJSON lines (already serialized) to `path`.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write NDJSON lines into a zstd-compressed file.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

pub fn read_json(path: &Path) -> Value {
    let f = File::open(path).unwrap();
    serde_json::from_reader(BufReader::new(f)).unwrap()
}

/// NDJSON lines of a small archive for `@alice`:
///
/// - line 1: `tweets` = [100 (root), 101 (reply to 100), [102 (reply to 100, later), 103 (reply to 101)]]
/// - line 2: an `account` object without tweets
/// - line 3: `tweets` = single wrapped 200, citing 100 twice and 999 (missing) once
/// - line 4: not JSON (skipped)
/// - line 5: `tweets` = [bare 201 (cites 100 + non-status links), 202 (cites @bob), 300 (root), 301 (reply to 300),
///           a tweet without id citing 300]
/// - line 6: `tweets` = null
///
/// Totals: 9 top-level elements, 10 posts (9 with ids), self-citing posts [200, 201, no-id],
/// tallies 100→3, 999→1, 300→1, threads 100→[100, 101, 103] and 300→[300, 301].
pub fn basic_archive_lines() -> Vec<String> {
    let t100 = tweet("100", "Thread start", "2020-01-01T10:00:00Z", None, &[], 5, 1);
    let t101 = tweet("101", "second", "2020-01-01T10:05:00Z", Some("100"), &[], 3, 0);
    let t102 = tweet("102", "side branch", "2020-01-01T10:10:00Z", Some("100"), &[], 7, 0);
    let t103 = tweet("103", "third", "2020-01-01T10:20:00Z", Some("101"), &[], 2, 4);

    let u100 = status_url(HANDLE, "100");
    let u999 = status_url(HANDLE, "999");
    let t200 = tweet("200", "as I said", "2020-02-01T09:00:00Z", None, &[u100.as_str(), u100.as_str(), u999.as_str()], 1, 0);

    let t201 = tweet(
        "201",
        "again",
        "2020-02-02T09:00:00Z",
        None,
        &["https://x.com/alice/status/100", "https://twitter.com/alice", "https://example.com/a"],
        0,
        0,
    );
    let t202 = tweet("202", "not me", "2020-02-03T09:00:00Z", None, &["https://twitter.com/bob/status/5"], 0, 0);
    let t300 = tweet("300", "Another thread", "2020-03-01T08:00:00Z", None, &[], 10, 2);
    let t301 = tweet("301", "and more", "2020-03-01T08:30:00Z", Some("300"), &[], 4, 1);
    let no_id = json!({
        "full_text": "orphan",
        "entities": { "urls": [ { "expanded_url": status_url(HANDLE, "300") } ] },
    });

    vec![
        json!({ "tweets": [wrapped(t100), wrapped(t101), [wrapped(t102), wrapped(t103)]] }).to_string(),
        json!({ "account": { "username": HANDLE } }).to_string(),
        json!({ "tweets": wrapped(t200) }).to_string(),
        "{ this is not json".to_string(),
        json!({ "tweets": [t201, wrapped(t202), wrapped(t300), wrapped(t301), wrapped(no_id)] }).to_string(),
        json!({ "tweets": null }).to_string(),
    ]
}

/// Write the basic archive under a fresh temp dir. Keep the `TempDir` alive for the test.
pub fn make_archive_basic() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.json");
    write_lines(&path, &basic_archive_lines());
    (dir, path)
}
