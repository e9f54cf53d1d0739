mod config;
mod util;
mod progress;
mod json_utils;
mod ndjson;

mod archive;
mod normalize;
mod post;
mod index;
mod citations;
mod enrich;
mod threads;

mod artifacts;
mod pipeline;

pub use crate::config::{AnalysisOptions, DEFAULT_HANDLE};
pub use crate::pipeline::{Analysis, TweetETL};

// Archive input and the raw element model.
pub use crate::archive::{load_archive, Archive, ArchiveFormat, TWEETS_KEY};
pub use crate::normalize::{normalize, RawRecord, WRAPPER_KEY};
pub use crate::post::{Link, Mention, Post};

// Core stages, usable on their own.
pub use crate::index::PostIndex;
pub use crate::citations::{find_self_citations, CitationCount, CitationResolver, CitationTable};
pub use crate::enrich::{enrich, EnrichedCitation, Enrichment, NOT_FOUND_TEXT};
pub use crate::threads::{reconstruct_threads, LongestThread, Thread, ThreadMap, ThreadMetadata, ThreadStatistics, ThreadTweet};

// Artifact names and the atomic JSON writer.
pub use crate::artifacts::{
    write_json_artifact, ARTIFACT_FILES, CITATION_COUNTS_FILE, ENRICHED_FILE, NOT_FOUND_FILE, SELF_CITATIONS_FILE,
    THREADS_FILE, THREAD_STATS_FILE, TOTAL_ELEMENTS_FILE,
};

pub use crate::util::{init_tracing_once, open_with_backoff, create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
