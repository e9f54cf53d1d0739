//! Record normalizer: turns the heterogeneous archive element stream into flat posts.
//!
//! Archive elements come in three shapes:
//!  - `{"tweet": {...}}`   a wrapped post
//!  - `[ ... ]`            a nested sequence of elements
//!  - `{...}`              a bare post
//!
//! `RawRecord` names those shapes explicitly; `normalize` flattens them depth-first,
//! preserving the order in which posts appear in the archive.

use crate::post::Post;
use serde_json::Value;

/// Key under which archive exports wrap each post.
pub const WRAPPER_KEY: &str = "tweet";

#[derive(Clone, Debug, PartialEq)]
pub enum RawRecord {
    /// Payload found under the wrapper key.
    Wrapped(Value),
    /// Anything that is neither wrapped nor a sequence.
    Bare(Value),
    Sequence(Vec<RawRecord>),
}

impl RawRecord {
    /// Classify a raw JSON element.
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::Array(items) => RawRecord::Sequence(items.into_iter().map(RawRecord::from_value).collect()),
            Value::Object(mut map) => match map.remove(WRAPPER_KEY) {
                Some(inner) => RawRecord::Wrapped(inner),
                None => RawRecord::Bare(Value::Object(map)),
            },
            other => RawRecord::Bare(other),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(v: Value) -> Self {
        RawRecord::from_value(v)
    }
}

/// Flatten raw records into posts, in archive order.
///
/// Elements that are not JSON objects once unwrapped cannot be posts and are dropped.
/// Objects without an identifier are kept: they still take part in URL scanning, and
/// the ID-keyed structures skip them on their own.
pub fn normalize(records: impl IntoIterator<Item = RawRecord>) -> Vec<Post> {
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for rec in records {
        flatten_into(rec, &mut out, &mut dropped);
    }
    let without_id = out.iter().filter(|p| p.id.is_none()).count();
    tracing::debug!(
        "normalized {} posts ({} without id, {} non-object elements dropped)",
        out.len(),
        without_id,
        dropped
    );
    out
}

fn flatten_into(rec: RawRecord, out: &mut Vec<Post>, dropped: &mut usize) {
    match rec {
        RawRecord::Sequence(items) => {
            for item in items {
                flatten_into(item, out, dropped);
            }
        }
        RawRecord::Wrapped(v) | RawRecord::Bare(v) => {
            if v.is_object() {
                out.push(Post::from_value(v));
            } else {
                *dropped += 1;
            }
        }
    }
}
