use std::path::{Path, PathBuf};

/// Handle used when none is configured.
pub const DEFAULT_HANDLE: &str = "visakanv";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub handle: String,               // account screen name, matched case-sensitively
    pub out_dir: PathBuf,             // where artifacts are written by `run`
    pub pretty: bool,                 // pretty-print artifacts (2-space indent)
    pub progress: bool,               // show progress bars
    pub progress_label: Option<String>, // optional label for the read progress bar

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            handle: DEFAULT_HANDLE.to_string(),
            out_dir: PathBuf::from("./public"),
            pretty: true,
            progress: false,
            progress_label: None,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl AnalysisOptions {
    pub fn with_handle(mut self, handle: impl AsRef<str>) -> Self {
        let h = handle.as_ref().trim();
        self.handle = h.strip_prefix('@').unwrap_or(h).to_string();
        self
    }
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
