use crate::archive::{load_archive, Archive};
use crate::artifacts::{
    write_json_artifact, ARTIFACT_FILES, CITATION_COUNTS_FILE, ENRICHED_FILE, NOT_FOUND_FILE, SELF_CITATIONS_FILE,
    THREADS_FILE, THREAD_STATS_FILE, TOTAL_ELEMENTS_FILE,
};
use crate::citations::{find_self_citations, CitationResolver, CitationTable};
use crate::config::AnalysisOptions;
use crate::enrich::{enrich, EnrichedCitation, Enrichment};
use crate::index::PostIndex;
use crate::normalize::{normalize, RawRecord};
use crate::progress::make_count_progress;
use crate::threads::{reconstruct_threads, ThreadMap, ThreadStatistics};
use crate::util::init_tracing_once;
use anyhow::{ensure, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default)]
pub struct TweetETL {
    pub(crate) opts: AnalysisOptions,
}

/// Everything derived from one archive.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Top-level raw elements read (before flattening).
    pub total_elements: usize,
    /// Posts after normalization, including those without an id.
    pub post_count: usize,
    /// Distinct ids in the post index.
    pub indexed_posts: usize,
    /// Source objects of the self-citing posts, in archive order.
    pub self_citations: Vec<Value>,
    pub citation_counts: CitationTable,
    pub enrichment: Enrichment,
    pub threads: ThreadMap,
    pub thread_stats: ThreadStatistics,
}

impl Analysis {
    pub fn enriched(&self) -> &[EnrichedCitation] {
        &self.enrichment.results
    }

    pub fn not_found(&self) -> &[EnrichedCitation] {
        &self.enrichment.not_found
    }

    /// Write every artifact into `dir` (created if missing). Returns the written paths.
    pub fn write_to(&self, dir: &Path, pretty: bool, write_buf: usize, progress: bool) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;
        let pb = if progress { Some(make_count_progress(ARTIFACT_FILES.len() as u64, "Writing artifacts")) } else { None };

        let mut written = Vec::with_capacity(ARTIFACT_FILES.len());
        let mut put = |name: &str, res: Result<()>| -> Result<()> {
            res?;
            written.push(dir.join(name));
            if let Some(pb) = &pb { pb.inc(1); }
            Ok(())
        };
        let path = |name: &str| dir.join(name);

        put(SELF_CITATIONS_FILE, write_json_artifact(&path(SELF_CITATIONS_FILE), &self.self_citations, pretty, write_buf))?;
        put(CITATION_COUNTS_FILE, write_json_artifact(&path(CITATION_COUNTS_FILE), &self.citation_counts, pretty, write_buf))?;
        put(ENRICHED_FILE, write_json_artifact(&path(ENRICHED_FILE), &self.enrichment.results, pretty, write_buf))?;
        put(NOT_FOUND_FILE, write_json_artifact(&path(NOT_FOUND_FILE), &self.enrichment.not_found, pretty, write_buf))?;
        put(THREADS_FILE, write_json_artifact(&path(THREADS_FILE), &self.threads, pretty, write_buf))?;
        put(THREAD_STATS_FILE, write_json_artifact(&path(THREAD_STATS_FILE), &self.thread_stats, pretty, write_buf))?;
        put(TOTAL_ELEMENTS_FILE, write_json_artifact(&path(TOTAL_ELEMENTS_FILE), &self.total_elements, pretty, write_buf))?;

        if let Some(pb) = pb { pb.finish_with_message("Artifacts written"); }
        Ok(written)
    }
}

impl TweetETL {
    pub fn new() -> Self {
        Self { opts: AnalysisOptions::default() }
    }

    pub fn with_options(opts: AnalysisOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn handle(mut self, handle: impl AsRef<str>) -> Self { self.opts = self.opts.with_handle(handle); self }
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn pretty(mut self, yes: bool) -> Self { self.opts = self.opts.with_pretty(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &AnalysisOptions {
        &self.opts
    }

    /// Read the raw element stream of an archive file.
    pub fn load(&self, archive: &Path) -> Result<Archive> {
        init_tracing_once();
        load_archive(archive, &self.opts)
    }

    /// Run the in-memory analysis over raw elements.
    pub fn analyze(&self, records: Vec<RawRecord>) -> Result<Analysis> {
        init_tracing_once();
        let handle = self.opts.handle.as_str();
        ensure!(!handle.is_empty(), "account handle is required");

        let total_elements = records.len();
        let posts = normalize(records);
        let index = PostIndex::build(&posts);
        tracing::info!("normalized {} posts, {} distinct ids", posts.len(), index.len());

        let resolver = CitationResolver::new(handle)?;
        let cites = find_self_citations(&posts, resolver.handle());
        tracing::info!("found {} self-citing tweets for @{}", cites.len(), resolver.handle());

        let citation_counts = resolver.count(cites.iter().copied());
        tracing::info!(
            "{} distinct tweets self-cited ({} citations)",
            citation_counts.len(),
            citation_counts.total_citations()
        );

        let enrichment = enrich(&citation_counts, &index);
        let threads = reconstruct_threads(&posts, &index);
        let thread_stats = ThreadStatistics::from_threads(&threads);
        tracing::info!(
            "built {} threads (average length {})",
            thread_stats.total_threads,
            thread_stats.average_thread_length
        );

        Ok(Analysis {
            total_elements,
            post_count: posts.len(),
            indexed_posts: index.len(),
            self_citations: cites.iter().map(|p| p.raw.clone()).collect(),
            citation_counts,
            enrichment,
            threads,
            thread_stats,
        })
    }

    /// Load `archive`, analyze it, and write every artifact into the configured `out_dir`.
    pub fn run(&self, archive: &Path) -> Result<Analysis> {
        let loaded = self.load(archive)?;
        let analysis = self.analyze(loaded.records)?;
        let written = analysis.write_to(&self.opts.out_dir, self.opts.pretty, self.opts.write_buffer_bytes, self.opts.progress)?;
        tracing::info!("wrote {} artifacts to {}", written.len(), self.opts.out_dir.display());
        Ok(analysis)
    }
}
