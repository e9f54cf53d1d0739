use anyhow::Result;
use std::path::PathBuf;
use tetl::{init_tracing_once, TweetETL, DEFAULT_HANDLE};

const ARCHIVE_PATH: &str = "./archive.json";
const OUT_DIR: &str = "./public";

/// Usage: tetl [archive] [out_dir]
/// Env: TETL_HANDLE, TETL_ARCHIVE, TETL_OUT_DIR (positional arguments win).
fn main() -> Result<()> {
    init_tracing_once();
    let mut args = std::env::args().skip(1);

    let archive = args
        .next()
        .or_else(|| std::env::var("TETL_ARCHIVE").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(ARCHIVE_PATH));
    let out_dir = args
        .next()
        .or_else(|| std::env::var("TETL_OUT_DIR").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(OUT_DIR));
    let handle = std::env::var("TETL_HANDLE").unwrap_or_else(|_| DEFAULT_HANDLE.to_string());

    let analysis = TweetETL::new()
        .handle(&handle)
        .out_dir(&out_dir)
        .progress(true)
        .run(&archive)?;

    println!(
        "@{}: {} self-citations of {} tweets ({} not found), {} threads -> {}",
        handle,
        analysis.citation_counts.total_citations(),
        analysis.citation_counts.len(),
        analysis.not_found().len(),
        analysis.thread_stats.total_threads,
        out_dir.display()
    );
    Ok(())
}
