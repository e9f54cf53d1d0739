//! Archive reader: loads the raw element stream that feeds the normalizer.
//!
//! Two layouts are accepted, detected from the first non-whitespace byte:
//!  - NDJSON (the archive export), one object per line; post elements live under the
//!    `tweets` key, either as a single record or a sequence of records.
//!  - A JSON array of elements (an already split `tweets.json`).
//!
//! Files ending in `.zst` are decoded on the fly.

use crate::config::AnalysisOptions;
use crate::ndjson::NdjsonReader;
use crate::normalize::RawRecord;
use crate::progress::make_progress_bar_labeled;
use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Top-level key holding post elements in each NDJSON object.
pub const TWEETS_KEY: &str = "tweets";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Ndjson,
    JsonArray,
}

/// Raw elements read from an archive file.
#[derive(Clone, Debug)]
pub struct Archive {
    pub format: ArchiveFormat,
    pub records: Vec<RawRecord>,
    /// NDJSON lines that were not valid JSON and were skipped.
    pub skipped_lines: u64,
}

impl Archive {
    /// Number of top-level elements read (before flattening).
    pub fn total_elements(&self) -> usize {
        self.records.len()
    }
}

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map_or(false, |e| e.eq_ignore_ascii_case("zst"))
}

/// Load every raw element of the archive at `path`.
///
/// Unreadable files, undecodable zstd streams, and invalid top-level arrays are fatal.
/// Invalid NDJSON lines are skipped with a warning.
pub fn load_archive(path: &Path, opts: &AnalysisOptions) -> Result<Archive> {
    let file = open_with_backoff(path, 16, 50).with_context(|| format!("open archive {}", path.display()))?;
    let total_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let pb = if opts.progress {
        Some(make_progress_bar_labeled(total_bytes, Some(opts.progress_label.as_deref().unwrap_or("Reading archive"))))
    } else {
        None
    };
    let counted: Box<dyn Read> = match &pb {
        Some(pb) => Box::new(pb.wrap_read(file)),
        None => Box::new(file),
    };
    let decoded: Box<dyn Read> = if is_zst(path) {
        Box::new(zstd::stream::read::Decoder::new(counted).with_context(|| format!("zstd decoder for {}", path.display()))?)
    } else {
        counted
    };
    let mut rdr = BufReader::with_capacity(opts.read_buffer_bytes.max(8 * 1024), decoded);

    let archive = match first_significant_byte(&mut rdr).with_context(|| format!("read {}", path.display()))? {
        Some(b'[') => read_json_array(rdr).with_context(|| format!("parse JSON array {}", path.display()))?,
        _ => read_ndjson(rdr, path).with_context(|| format!("read NDJSON {}", path.display()))?,
    };

    if let Some(pb) = pb {
        pb.finish_with_message("Archive loaded");
    }
    tracing::info!(
        "loaded {} elements from {} ({:?}, {} invalid lines skipped)",
        archive.records.len(),
        path.display(),
        archive.format,
        archive.skipped_lines
    );
    Ok(archive)
}

/// Skip leading whitespace and return the next byte without consuming it.
fn first_significant_byte<R: BufRead>(r: &mut R) -> io::Result<Option<u8>> {
    loop {
        let buf = r.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => {
                let b = buf[i];
                r.consume(i);
                return Ok(Some(b));
            }
            None => {
                let n = buf.len();
                r.consume(n);
            }
        }
    }
}

fn read_json_array<R: BufRead>(rdr: R) -> Result<Archive> {
    let values: Vec<Value> = serde_json::from_reader(rdr)?;
    Ok(Archive {
        format: ArchiveFormat::JsonArray,
        records: values.into_iter().map(RawRecord::from_value).collect(),
        skipped_lines: 0,
    })
}

fn read_ndjson<R: BufRead>(rdr: R, path: &Path) -> Result<Archive> {
    let mut reader = NdjsonReader::new(rdr);
    let mut records = Vec::new();
    let mut skipped_lines = 0u64;
    let mut line = String::new();

    while reader.read_line(&mut line)? > 0 {
        if line.trim().is_empty() {
            continue;
        }
        let mut v: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}:{}: skipping invalid JSON line: {}", path.display(), reader.line_no(), e);
                skipped_lines += 1;
                continue;
            }
        };
        match v.get_mut(TWEETS_KEY).map(Value::take) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => records.extend(items.into_iter().map(RawRecord::from_value)),
            Some(single) => records.push(RawRecord::from_value(single)),
        }
    }

    Ok(Archive { format: ArchiveFormat::Ndjson, records, skipped_lines })
}
