//! Artifact output: each result is written as one JSON document, via a temp sibling that
//! is renamed into place so readers never see a half-written file.

use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SELF_CITATIONS_FILE: &str = "selfQuotedTweets.json";
pub const CITATION_COUNTS_FILE: &str = "countSelfQuotes.json";
pub const ENRICHED_FILE: &str = "tweet_results.json";
pub const NOT_FOUND_FILE: &str = "not_found_tweets.json";
pub const THREADS_FILE: &str = "twitter_threads.json";
pub const THREAD_STATS_FILE: &str = "thread_statistics.json";
pub const TOTAL_ELEMENTS_FILE: &str = "totalTweetLength.json";

/// All artifact names, in the order `TweetETL::run` writes them.
pub const ARTIFACT_FILES: [&str; 7] = [
    SELF_CITATIONS_FILE,
    CITATION_COUNTS_FILE,
    ENRICHED_FILE,
    NOT_FOUND_FILE,
    THREADS_FILE,
    THREAD_STATS_FILE,
    TOTAL_ELEMENTS_FILE,
];

fn tmp_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    dest.with_file_name(name)
}

/// Serialize `value` to `dest` (pretty: 2-space indent), atomically.
pub fn write_json_artifact<T: Serialize + ?Sized>(dest: &Path, value: &T, pretty: bool, write_buf: usize) -> Result<()> {
    let tmp = tmp_path_for(dest);
    {
        let f = create_with_backoff(&tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(write_buf.max(8 * 1024), f);
        let res = if pretty {
            serde_json::to_writer_pretty(&mut w, value)
        } else {
            serde_json::to_writer(&mut w, value)
        };
        res.with_context(|| format!("serialize {}", dest.display()))?;
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    replace_file_atomic_backoff(&tmp, dest)?;
    tracing::debug!("wrote {}", dest.display());
    Ok(())
}
